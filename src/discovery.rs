//! Page discovery in the scan archive.
//!
//! ```text
//! dataset_root/
//!   <session>/                 any directory, e.g. B400026954450-RT2
//!     <subsession>/            15-character name, e.g. 400026954450-03
//!       <YYYY-MM-DD...>/       daily directory
//!         *.alto.xml           one file per page
//! ```
//!
//! The intermediate JSON tree mirrors this layout with `.ndjson` pages.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

static DAILY_DIR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap());

const SUBSESSION_NAME_LEN: usize = 15;
const PAGE_EXT: &str = ".alto.xml";
const RECORD_EXT: &str = ".ndjson";

/// One page to extract and where its records go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageJob {
    pub source: PathBuf,
    pub target: PathBuf,
}

/// Sorted entries of `dir` whose file name satisfies `keep`.
fn list(dir: &Path, want_dirs: bool, keep: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() != want_dirs {
            continue;
        }
        if entry.file_name().to_str().is_some_and(&keep) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

pub fn session_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    list(root, true, |_| true)
}

pub fn subsession_dirs(session: &Path) -> Result<Vec<PathBuf>> {
    list(session, true, |name| name.chars().count() == SUBSESSION_NAME_LEN)
}

pub fn daily_dirs(subsession: &Path) -> Result<Vec<PathBuf>> {
    list(subsession, true, |name| DAILY_DIR_RE.is_match(name))
}

pub fn page_files(daily: &Path) -> Result<Vec<PathBuf>> {
    list(daily, false, |name| name.ends_with(PAGE_EXT))
}

/// Every page under `root`, paired with its record file under `target`.
///
/// Output directories are created as the tree is walked; existing ones are
/// reused so interrupted runs can be resumed.
pub fn mirror_layout(root: &Path, target: &Path) -> Result<Vec<PageJob>> {
    let mut jobs = Vec::new();
    for session in session_dirs(root)? {
        for subsession in subsession_dirs(&session)? {
            for daily in daily_dirs(&subsession)? {
                let rel = daily.strip_prefix(root)?;
                let out_dir = target.join(rel);
                fs::create_dir_all(&out_dir)
                    .with_context(|| format!("Failed to create {}", out_dir.display()))?;

                for source in page_files(&daily)? {
                    let Some(name) = source.file_name().and_then(|n| n.to_str()) else {
                        continue;
                    };
                    let stem = name.strip_suffix(PAGE_EXT).unwrap_or(name);
                    let target = out_dir.join(format!("{stem}{RECORD_EXT}"));
                    jobs.push(PageJob { source, target });
                }
            }
        }
    }
    Ok(jobs)
}

/// All `*/*/*/*.ndjson` under `root`, sorted by path.
pub fn record_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for session in list(root, true, |_| true)? {
        for subsession in list(&session, true, |_| true)? {
            for daily in list(&subsession, true, |_| true)? {
                out.extend(list(&daily, false, |name| name.ends_with(RECORD_EXT))?);
            }
        }
    }
    out.sort();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn archive() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let r = dir.path();
        touch(&r.join("B400026954450-RT2/400026954450-03/1933-06-25-01/aarhusstiftstidende-1933-06-25-01-0553A.alto.xml"));
        touch(&r.join("B400026954450-RT2/400026954450-03/1933-06-25-01/aarhusstiftstidende-1933-06-25-01-0554A.alto.xml"));
        touch(&r.join("B400026954450-RT2/400026954450-03/1933-06-25-01/notes.txt"));
        touch(&r.join("B400026954450-RT2/400026954450-03/scans/x.alto.xml"));
        touch(&r.join("B400026954450-RT2/short/1933-06-26-01/x-1933-06-26-01-0001A.alto.xml"));
        touch(&r.join("B400026954450-RT1/400026954450-01/1932-01-02-01/aarhusstiftstidende-1932-01-02-01-0001A.alto.xml"));
        touch(&r.join("README.txt"));
        dir
    }

    #[test]
    fn finds_only_pages_in_layout() {
        let src = archive();
        let out = tempfile::tempdir().unwrap();
        let jobs = mirror_layout(src.path(), out.path()).unwrap();

        let names: Vec<_> = jobs
            .iter()
            .map(|j| j.target.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "aarhusstiftstidende-1932-01-02-01-0001A.ndjson",
                "aarhusstiftstidende-1933-06-25-01-0553A.ndjson",
                "aarhusstiftstidende-1933-06-25-01-0554A.ndjson",
            ]
        );
        assert_eq!(
            jobs[1].target,
            out.path().join("B400026954450-RT2/400026954450-03/1933-06-25-01/aarhusstiftstidende-1933-06-25-01-0553A.ndjson")
        );
        assert!(jobs[1].target.parent().unwrap().is_dir());
    }

    #[test]
    fn mirroring_twice_is_fine() {
        let src = archive();
        let out = tempfile::tempdir().unwrap();
        let first = mirror_layout(src.path(), out.path()).unwrap();
        let second = mirror_layout(src.path(), out.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn record_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let r = dir.path();
        touch(&r.join("S2/sub/1933-06-25-01/b-1933-06-25-01-0002A.ndjson"));
        touch(&r.join("S1/sub/1932-01-02-01/a-1932-01-02-01-0001A.ndjson"));
        touch(&r.join("S1/sub/1932-01-02-01/a-1932-01-02-01-0001A.alto.xml"));
        touch(&r.join("S1/stray.ndjson"));

        let files = record_files(r).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("S1/sub/1932-01-02-01/a-1932-01-02-01-0001A.ndjson"));
    }
}
