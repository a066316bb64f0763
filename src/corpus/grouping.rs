use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::error::{CorpusError, Result};
use crate::filename::date_of_path;

/// Width of a time bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Day,
    Month,
    Year,
}

impl Resolution {
    pub fn code(self) -> &'static str {
        match self {
            Resolution::Day => "D",
            Resolution::Month => "M",
            Resolution::Year => "Y",
        }
    }

    /// First day of the period containing `date`.
    pub fn period_start(self, date: NaiveDate) -> NaiveDate {
        let (year, month, day) = match self {
            Resolution::Day => return date,
            Resolution::Month => (date.year(), date.month(), 1),
            Resolution::Year => (date.year(), 1, 1),
        };
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
    }
}

impl FromStr for Resolution {
    type Err = CorpusError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "D" | "DAY" => Ok(Resolution::Day),
            "M" | "MONTH" => Ok(Resolution::Month),
            "Y" | "YEAR" => Ok(Resolution::Year),
            _ => Err(CorpusError::UnrecognizedResolution(s.to_string())),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Page files falling into one time bin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateGroup {
    pub start: NaiveDate,
    pub resolution: Resolution,
    pub paths: Vec<PathBuf>,
}

impl DateGroup {
    /// `1933-06-01_M`
    pub fn stem(&self) -> String {
        format!("{}_{}", self.start.format("%Y-%m-%d"), self.resolution.code())
    }
}

/// Bin page files by the date in their file names.
///
/// Groups come out in ascending period order whatever the input order; inside a
/// group, paths keep the order they were given in. Any path without a parseable
/// date fails the whole batch.
pub fn group_paths(paths: &[PathBuf], resolution: Resolution) -> Result<Vec<DateGroup>> {
    let mut bins: BTreeMap<NaiveDate, Vec<PathBuf>> = BTreeMap::new();
    for path in paths {
        let date = date_of_path(path)?;
        bins.entry(resolution.period_start(date))
            .or_default()
            .push(path.clone());
    }

    Ok(bins
        .into_iter()
        .map(|(start, paths)| DateGroup {
            start,
            resolution,
            paths,
        })
        .collect())
}
