use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CorpusError, Result};
use crate::record::{BlockRecord, Line};

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());
static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").unwrap());
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone)]
pub struct CleanerConfig {
    /// Tokens with at most this many characters are dropped before cleaning.
    pub length_threshold: usize,
    pub stopwords: Option<HashSet<String>>,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            length_threshold: 1,
            stopwords: None,
        }
    }
}

/// Token-level normalization for OCR text.
#[derive(Debug, Clone, Default)]
pub struct TextCleaner {
    config: CleanerConfig,
}

impl TextCleaner {
    pub fn new(config: CleanerConfig) -> Self {
        Self { config }
    }

    /// Strip digits, punctuation and whitespace from each token; drop short
    /// tokens, stopwords and anything left empty.
    pub fn clean_line(&self, tokens: &[String]) -> Line {
        tokens.iter().filter_map(|t| self.clean_token(t)).collect()
    }

    fn clean_token(&self, token: &str) -> Option<String> {
        if token.chars().count() <= self.config.length_threshold {
            return None;
        }
        // digits, then non-word runs, then whitespace: the order matters
        let token = DIGITS_RE.replace_all(token, " ");
        let token = NON_WORD_RE.replace_all(&token, " ");
        let token = SPACE_RE.replace_all(&token, "").into_owned();

        if token.is_empty() {
            return None;
        }
        match &self.config.stopwords {
            Some(stop) if stop.contains(&token) => None,
            _ => Some(token),
        }
    }

    /// Rewrite every block's content in place. Lines that clean to nothing are
    /// removed; blocks are kept even when all their lines go.
    pub fn clean_file(&self, blocks: &mut [BlockRecord]) {
        for block in blocks.iter_mut() {
            block.content = block
                .content
                .iter()
                .map(|line| self.clean_line(line))
                .filter(|line| !line.is_empty())
                .collect();
        }
    }
}

/// One stopword per line; blank lines are skipped.
pub fn load_stopwords(path: &Path) -> Result<HashSet<String>> {
    let text = fs::read_to_string(path).map_err(|source| CorpusError::StorageRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}
