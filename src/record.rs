use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CorpusError, Result};

const TMP_SUFFIX: &str = ".tmp";

/// One line of text: tokens in reading order.
pub type Line = Vec<String>;

/// One text block of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub date: NaiveDate,
    pub page_id: String,
    pub source_img: String,
    pub content: Vec<Line>,
}

/// All blocks of one physical page, in reading order.
pub type PageDocument = Vec<BlockRecord>;

/// Persistence of per-page record lists.
pub trait RecordStore {
    fn load(&self, path: &Path) -> Result<PageDocument>;
    fn save(&self, path: &Path, page: &[BlockRecord]) -> Result<()>;
}

/// Newline-delimited JSON, one `BlockRecord` per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NdjsonStore;

impl RecordStore for NdjsonStore {
    fn load(&self, path: &Path) -> Result<PageDocument> {
        let read_err = |source| CorpusError::StorageRead {
            path: path.to_path_buf(),
            source,
        };
        let reader = BufReader::new(File::open(path).map_err(read_err)?);

        let mut page = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(read_err)?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|source| CorpusError::CorruptRecord {
                path: path.to_path_buf(),
                line: i + 1,
                source,
            })?;
            page.push(record);
        }
        Ok(page)
    }

    /// Written to a sibling `.tmp` file and renamed into place, so an
    /// interrupted write never leaves a truncated record file at `path`.
    fn save(&self, path: &Path, page: &[BlockRecord]) -> Result<()> {
        let write_err = |source| CorpusError::StorageWrite {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let tmp = tmp_path(path);
        let written = write_lines(&tmp, page).and_then(|()| fs::rename(&tmp, path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(write_err(e));
        }
        Ok(())
    }
}

/// `page.ndjson` → `page.ndjson.tmp`
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(TMP_SUFFIX);
    PathBuf::from(name)
}

fn write_lines(path: &Path, page: &[BlockRecord]) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for record in page {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
    }
    out.flush()
}
