//! filetree/mod.rs
//! Batch processing over a directory of log files.
//!
//! A walk yields every regular file; each processor filters it with its own
//! `FileFilter` and acts on it through the auto-detect pipeline. Failures are
//! isolated per file.

pub mod filter;
pub mod processor;
pub mod walk;

pub use filter::{name_date, parse_date_range, parse_duration, parse_size, DateRange, FileFilter, FilterError};
pub use processor::{
    CompressProcessor, DebugProcessor, DeleteProcessor, FileProcessor, ListEntry, ListProcessor, UploadProcessor,
};
pub use walk::{process_walk, walk, Walk, WalkSummary};
