use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{CorpusError, Result};

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap());
static PAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{4}-\d{2}-\d{2}-\d{2}-(.+?)\.(?:jp2|alto\.xml)").unwrap()
});

fn malformed(name: &str) -> CorpusError {
    CorpusError::MalformedFilename {
        name: name.to_string(),
    }
}

/// First `YYYY-MM-DD` in `name`, checked against the calendar.
pub fn parse_date(name: &str) -> Result<NaiveDate> {
    let m = DATE_RE.find(name).ok_or_else(|| malformed(name))?;
    NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").map_err(|_| malformed(name))
}

/// Page id: the token after the `YYYY-MM-DD-NN-` prefix, up to the image extension.
///
/// `aarhusstiftstidende-1933-06-25-01-0553A.jp2` → `0553A`
pub fn parse_page_id(name: &str) -> Result<String> {
    PAGE_RE
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| malformed(name))
}

/// Date embedded in the file name component of `path` (directories are ignored).
pub fn date_of_path(path: &Path) -> Result<NaiveDate> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| malformed(&path.to_string_lossy()))?;
    parse_date(name)
}
