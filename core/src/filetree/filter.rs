//! filetree/filter.rs
//! Compiled file selection predicate: age, size, name date and name glob.

use std::fs::Metadata;
use std::path::Path;
use std::time::{Duration, SystemTime};

use chrono::{Days, NaiveDate};
use thiserror::Error;

use crate::config::FilterConfig;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid duration: {0:?}")]
    InvalidDuration(String),

    #[error("invalid size: {0:?}")]
    InvalidSize(String),

    #[error("invalid date range: {0:?}")]
    InvalidDate(String),

    #[error("invalid name pattern {pattern:?}: {msg}")]
    InvalidGlob { pattern: String, msg: String },
}

/// Half-open `[start, end)` day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day < self.end
    }
}

#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    pub older: Option<Duration>,
    pub newer: Option<Duration>,
    pub bigger: Option<u64>,
    pub smaller: Option<u64>,
    pub date: Option<DateRange>,
    pub name: Option<glob::Pattern>,
}

impl FileFilter {
    /// Accept everything.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn from_config(config: &FilterConfig) -> Result<Self, FilterError> {
        Ok(Self {
            older: config.older.as_deref().map(parse_duration).transpose()?,
            newer: config.newer.as_deref().map(parse_duration).transpose()?,
            bigger: config.bigger.as_deref().map(parse_size).transpose()?,
            smaller: config.smaller.as_deref().map(parse_size).transpose()?,
            date: config.date.as_deref().map(parse_date_range).transpose()?,
            name: config
                .name
                .as_deref()
                .map(|p| {
                    glob::Pattern::new(p).map_err(|e| FilterError::InvalidGlob {
                        pattern: p.to_string(),
                        msg: e.to_string(),
                    })
                })
                .transpose()?,
        })
    }

    pub fn matches(&self, path: &Path, meta: &Metadata) -> bool {
        self.matches_at(path, meta, SystemTime::now())
    }

    /// `matches` against an explicit clock.
    pub fn matches_at(&self, path: &Path, meta: &Metadata, now: SystemTime) -> bool {
        let mtime = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        if let Some(older) = self.older {
            let limit = now.checked_sub(older).unwrap_or(SystemTime::UNIX_EPOCH);
            if mtime > limit {
                return false;
            }
        }
        if let Some(newer) = self.newer {
            let limit = now.checked_sub(newer).unwrap_or(SystemTime::UNIX_EPOCH);
            if mtime < limit {
                return false;
            }
        }
        if self.smaller.is_some_and(|max| meta.len() > max) {
            return false;
        }
        if self.bigger.is_some_and(|min| meta.len() < min) {
            return false;
        }

        let file_name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        if let Some(range) = &self.date {
            match name_date(&file_name) {
                Some(day) if range.contains(day) => {}
                _ => return false,
            }
        }
        if let Some(pattern) = &self.name {
            if !pattern.matches(&file_name) {
                return false;
            }
        }
        true
    }
}

/// Date encoded at the start of a log file name: `2024-01-01.log.gz`.
pub fn name_date(file_name: &str) -> Option<NaiveDate> {
    let stem = file_name.split('.').next()?;
    NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()
}

/// `10`, `90s`, `15m`, `36h`, `2d`, `1w`, `1d12h`, `1day 6hours`.
/// A bare number is seconds.
pub fn parse_duration(text: &str) -> Result<Duration, FilterError> {
    let s = text.trim();
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse().map(Duration::from_secs).map_err(|_| FilterError::InvalidDuration(text.to_string()));
    }
    humantime::parse_duration(s).map_err(|_| FilterError::InvalidDuration(text.to_string()))
}

/// `512`, `1k`, `4.1k`, `10M`, `2GiB`. Units are binary (1k = 1024).
pub fn parse_size(text: &str) -> Result<u64, FilterError> {
    ::parse_size::Config::new()
        .with_binary()
        .parse_size(text.trim())
        .map_err(|_| FilterError::InvalidSize(text.to_string()))
}

/// `YYYY-MM-DD` selects one day; `A..B` selects `[A, B)`.
pub fn parse_date_range(text: &str) -> Result<DateRange, FilterError> {
    let err = || FilterError::InvalidDate(text.to_string());
    let day = |s: &str| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| err());
    match text.split_once("..") {
        Some((a, b)) => {
            let (start, end) = (day(a)?, day(b)?);
            if end < start {
                return Err(err());
            }
            Ok(DateRange { start, end })
        }
        None => {
            let start = day(text)?;
            let end = start.checked_add_days(Days::new(1)).ok_or_else(err)?;
            Ok(DateRange { start, end })
        }
    }
}
