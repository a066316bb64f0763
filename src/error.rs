use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by extraction, storage, and binning.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("filename '{name}' does not carry a YYYY-MM-DD date and page id")]
    MalformedFilename { name: String },
    #[error("required field '{field}' missing in {}", path.display())]
    MissingRequiredField { field: &'static str, path: PathBuf },
    #[error("malformed XML in {}: {source}", path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },
    #[error("cannot read {}: {source}", path.display())]
    StorageRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {}: {source}", path.display())]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("corrupt record at {}:{line}: {source}", path.display())]
    CorruptRecord {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("time bin frequency '{0}' not recognized (expected D, M or Y)")]
    UnrecognizedResolution(String),
}

pub type Result<T> = std::result::Result<T, CorpusError>;
