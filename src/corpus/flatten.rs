use crate::record::BlockRecord;

/// Joiners used when turning records into plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Separators {
    pub word: String,
    pub line: String,
    pub block: String,
    /// Between pages of one time bin.
    pub file: String,
}

impl Separators {
    /// Keeps block and page boundaries visible.
    pub fn readable() -> Self {
        Self {
            word: " ".into(),
            line: "\n".into(),
            block: "\n\n".into(),
            file: "\n\n\n\n".into(),
        }
    }

    /// Dense layout for cleaned text.
    pub fn preprocessed() -> Self {
        Self {
            word: " ".into(),
            line: "\n".into(),
            block: "\n".into(),
            file: "\n".into(),
        }
    }
}

impl Default for Separators {
    fn default() -> Self {
        Self::readable()
    }
}

pub fn flatten_page(blocks: &[BlockRecord], sep: &Separators) -> String {
    blocks
        .iter()
        .map(|block| {
            block
                .content
                .iter()
                .map(|line| line.join(&sep.word))
                .collect::<Vec<_>>()
                .join(&sep.line)
        })
        .collect::<Vec<_>>()
        .join(&sep.block)
}

/// Join flattened pages, skipping pages with no text.
pub fn join_pages<I>(pages: I, sep: &Separators) -> String
where
    I: IntoIterator<Item = String>,
{
    pages
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(&sep.file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn block(content: &[&[&str]]) -> BlockRecord {
        BlockRecord {
            date: NaiveDate::from_ymd_opt(1933, 6, 25).unwrap(),
            page_id: "0553A".into(),
            source_img: "x.jp2".into(),
            content: content
                .iter()
                .map(|l| l.iter().map(|t| t.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn readable_layout() {
        let page = vec![block(&[&["Aarhus", "Stiftstidende"], &["Søndag"]]), block(&[&["Vejret:"]])];
        assert_eq!(
            flatten_page(&page, &Separators::readable()),
            "Aarhus Stiftstidende\nSøndag\n\nVejret:"
        );
    }

    #[test]
    fn preprocessed_layout() {
        let page = vec![block(&[&["a", "b"]]), block(&[&["c"]])];
        assert_eq!(flatten_page(&page, &Separators::preprocessed()), "a b\nc");
    }

    #[test]
    fn readable_layout_splits_back() {
        let page = vec![
            block(&[&["Aarhus", "Stiftstidende"], &["Søndag", "den", "25.", "Juni"]]),
            block(&[&["Vejret:"]]),
            block(&[&["x"], &["y", "z"]]),
        ];
        let sep = Separators::readable();
        let text = flatten_page(&page, &sep);

        let rebuilt: Vec<Vec<Vec<String>>> = text
            .split(sep.block.as_str())
            .map(|b| {
                b.split(sep.line.as_str())
                    .map(|l| l.split(sep.word.as_str()).map(str::to_string).collect())
                    .collect()
            })
            .collect();
        let original: Vec<_> = page.into_iter().map(|b| b.content).collect();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn empty_pages_are_skipped() {
        let sep = Separators::readable();
        let joined = join_pages(vec!["one".to_string(), String::new(), "two".to_string()], &sep);
        assert_eq!(joined, "one\n\n\n\ntwo");
        assert_eq!(join_pages(Vec::<String>::new(), &sep), "");
    }

    #[test]
    fn blocks_without_lines_flatten_to_nothing() {
        assert_eq!(flatten_page(&[block(&[])], &Separators::readable()), "");
    }
}
