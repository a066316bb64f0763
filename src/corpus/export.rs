use std::fs;
use std::path::PathBuf;

use crate::error::{CorpusError, Result};

/// Destination for one time bin's text.
pub trait Exporter {
    fn export(&self, stem: &str, text: &str) -> Result<PathBuf>;
}

/// Writes `{out_dir}/{stem}.txt`, replacing any earlier file.
#[derive(Debug, Clone)]
pub struct TxtExporter {
    out_dir: PathBuf,
}

impl TxtExporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }
}

impl Exporter for TxtExporter {
    fn export(&self, stem: &str, text: &str) -> Result<PathBuf> {
        let path = self.out_dir.join(format!("{stem}.txt"));
        let write_err = |source| CorpusError::StorageWrite {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(&self.out_dir).map_err(write_err)?;
        fs::write(&path, text).map_err(write_err)?;
        Ok(path)
    }
}
