use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info};

use crate::error::Result;
use crate::record::RecordStore;

use super::cleaner::{CleanerConfig, TextCleaner};
use super::export::Exporter;
use super::flatten::{flatten_page, join_pages, Separators};
use super::grouping::DateGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Raw OCR tokens, block and page boundaries kept.
    Readable,
    /// Cleaned tokens, dense layout.
    Preprocessed,
}

#[derive(Debug, Clone)]
pub struct BinConfig {
    pub mode: Mode,
    pub separators: Separators,
    pub cleaner: CleanerConfig,
}

impl BinConfig {
    pub fn new(mode: Mode, cleaner: CleanerConfig) -> Self {
        let separators = match mode {
            Mode::Readable => Separators::readable(),
            Mode::Preprocessed => Separators::preprocessed(),
        };
        Self {
            mode,
            separators,
            cleaner,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BinStats {
    pub groups: usize,
    pub written: usize,
    pub failed: usize,
    pub pages: usize,
}

/// Loads each time bin's pages, optionally cleans them, and exports the
/// concatenated text, one output per bin.
pub struct Binner<S, E> {
    store: S,
    exporter: E,
    separators: Separators,
    cleaner: Option<TextCleaner>,
}

impl<S: RecordStore, E: Exporter> Binner<S, E> {
    pub fn new(store: S, exporter: E, config: BinConfig) -> Self {
        let cleaner = match config.mode {
            Mode::Readable => None,
            Mode::Preprocessed => Some(TextCleaner::new(config.cleaner)),
        };
        Self {
            store,
            exporter,
            separators: config.separators,
            cleaner,
        }
    }

    /// Text of one bin: pages in group order, empty pages left out.
    pub fn render_group(&self, group: &DateGroup) -> Result<String> {
        let mut pages = Vec::with_capacity(group.paths.len());
        for path in &group.paths {
            let mut page = self.store.load(path)?;
            if let Some(cleaner) = &self.cleaner {
                cleaner.clean_file(&mut page);
            }
            pages.push(flatten_page(&page, &self.separators));
        }
        Ok(join_pages(pages, &self.separators))
    }

    pub fn bin_group(&self, group: &DateGroup) -> Result<PathBuf> {
        let text = self.render_group(group)?;
        let path = self.exporter.export(&group.stem(), &text)?;
        debug!("{} pages -> {}", group.paths.len(), path.display());
        Ok(path)
    }

    /// Bin every group in order. A failing group is logged and skipped; groups
    /// already written stay on disk.
    pub fn run(&self, groups: &[DateGroup]) -> BinStats {
        let pb = ProgressBar::new(groups.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} bins ({per_sec}, eta {eta})")
        {
            pb.set_style(style.progress_chars("=> "));
        }

        let mut stats = BinStats {
            groups: groups.len(),
            ..Default::default()
        };
        for group in groups {
            match self.bin_group(group) {
                Ok(_) => {
                    stats.written += 1;
                    stats.pages += group.paths.len();
                }
                Err(e) => {
                    error!("Bin {} failed: {}", group.stem(), e);
                    stats.failed += 1;
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        info!(
            "Binned {} groups ({} written, {} failed, {} pages)",
            stats.groups, stats.written, stats.failed, stats.pages
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    use chrono::NaiveDate;

    use crate::corpus::export::TxtExporter;
    use crate::corpus::grouping::{group_paths, Resolution};
    use crate::record::{BlockRecord, NdjsonStore};

    fn write_page(dir: &Path, date: &str, page_id: &str, content: &[&[&str]]) -> PathBuf {
        let name = format!("aarhusstiftstidende-{date}-01-{page_id}");
        let record = BlockRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            page_id: page_id.into(),
            source_img: format!("{name}.jp2"),
            content: content
                .iter()
                .map(|l| l.iter().map(|t| t.to_string()).collect())
                .collect(),
        };
        let path = dir.join(format!("S-RT1/400026954450-01/{date}-01/{name}.ndjson"));
        NdjsonStore.save(&path, &[record]).unwrap();
        path
    }

    fn binner(out: &Path, mode: Mode) -> Binner<NdjsonStore, TxtExporter> {
        Binner::new(NdjsonStore, TxtExporter::new(out), BinConfig::new(mode, CleanerConfig::default()))
    }

    #[test]
    fn one_file_per_day() {
        let data = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let paths = vec![
            write_page(data.path(), "2020-01-01", "0001A", &[&["nytår", "1920"]]),
            write_page(data.path(), "2020-01-02", "0001A", &[&["anden", "dag"]]),
        ];
        let groups = group_paths(&paths, Resolution::Day).unwrap();

        let stats = binner(out.path(), Mode::Readable).run(&groups);
        assert_eq!(stats.written, 2);
        assert_eq!(
            fs::read_to_string(out.path().join("2020-01-01_D.txt")).unwrap(),
            "nytår 1920"
        );
        assert_eq!(
            fs::read_to_string(out.path().join("2020-01-02_D.txt")).unwrap(),
            "anden dag"
        );
    }

    #[test]
    fn readable_month_joins_pages_and_skips_empty() {
        let data = tempfile::tempdir().unwrap();
        let paths = vec![
            write_page(data.path(), "1933-06-25", "0553A", &[&["Aarhus"], &["Stiftstidende"]]),
            write_page(data.path(), "1933-06-25", "0554A", &[]),
            write_page(data.path(), "1933-06-26", "0001A", &[&["Vejret:"]]),
        ];
        let groups = group_paths(&paths, Resolution::Month).unwrap();
        let text = binner(data.path(), Mode::Readable).render_group(&groups[0]).unwrap();
        assert_eq!(text, "Aarhus\nStiftstidende\n\n\n\nVejret:");
    }

    #[test]
    fn preprocessed_cleans_and_packs() {
        let data = tempfile::tempdir().unwrap();
        let paths = vec![
            write_page(data.path(), "1933-06-25", "0553A", &[&["Aarhus", "25."], &["7"]]),
            write_page(data.path(), "1933-06-25", "0554A", &[&["1933"]]),
            write_page(data.path(), "1933-06-25", "0555A", &[&["Vejret:", "i", "Dag"]]),
        ];
        let groups = group_paths(&paths, Resolution::Day).unwrap();
        let text = binner(data.path(), Mode::Preprocessed).render_group(&groups[0]).unwrap();
        assert_eq!(text, "Aarhus\nVejret Dag");
    }

    #[test]
    fn failing_group_does_not_stop_others() {
        let data = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let good = write_page(data.path(), "2020-01-02", "0001A", &[&["ok"]]);
        let missing = data.path().join("S/x/y/aarhusstiftstidende-2020-01-01-01-0001A.ndjson");
        let groups = group_paths(&[missing, good], Resolution::Day).unwrap();

        let stats = binner(out.path(), Mode::Readable).run(&groups);
        assert_eq!(stats, BinStats { groups: 2, written: 1, failed: 1, pages: 1 });
        assert!(!out.path().join("2020-01-01_D.txt").exists());
        assert!(out.path().join("2020-01-02_D.txt").exists());
    }
}
