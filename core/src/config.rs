//! config.rs
//! Chunking, file selection and batch processing configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MERGE_BUFSIZE, DEFAULT_PROCESS_MODE, DEFAULT_READ_CHUNK_SIZE, MAX_CHUNK_SIZE, MIN_CHUNK_SIZE,
};
use crate::types::StreamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Bytes requested per read from a file or memory source.
    pub read_chunk_size: usize,
    /// Merge output buffer threshold.
    pub merge_bufsize: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            merge_bufsize: DEFAULT_MERGE_BUFSIZE,
        }
    }
}

impl ChunkConfig {
    pub fn new(read_chunk_size: Option<usize>, merge_bufsize: Option<usize>) -> Result<Self, StreamError> {
        let config = Self {
            read_chunk_size: read_chunk_size.unwrap_or(DEFAULT_READ_CHUNK_SIZE),
            merge_bufsize: merge_bufsize.unwrap_or(DEFAULT_MERGE_BUFSIZE),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), StreamError> {
        for (what, size) in [("read chunk", self.read_chunk_size), ("merge buffer", self.merge_bufsize)] {
            if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&size) {
                return Err(StreamError::Validation(format!(
                    "{what} size {size} outside {MIN_CHUNK_SIZE}..={MAX_CHUNK_SIZE}"
                )));
            }
        }
        Ok(())
    }
}

/// File selection as given on the command line; compiled into a
/// `filetree::FileFilter` before a walk starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Only files last modified at least this long ago (`2d`, `36h`, `1w`).
    pub older: Option<String>,
    /// Only files modified within this duration.
    pub newer: Option<String>,
    /// Only files at least this large (`1k`, `4.1k`, `10M`; binary units).
    pub bigger: Option<String>,
    /// Only files at most this large.
    pub smaller: Option<String>,
    /// `YYYY-MM-DD` or half-open `YYYY-MM-DD..YYYY-MM-DD`, matched against
    /// the date the file name starts with.
    pub date: Option<String>,
    /// Glob over the file name.
    pub name: Option<String>,
}

/// What a processing walk does to each selected file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// Log the action without touching anything.
    pub dry: bool,
    /// Target compression mode.
    pub mode: String,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self { dry: false, mode: DEFAULT_PROCESS_MODE.to_string() }
    }
}
