//! serve/mod.rs
//! Framework-free read endpoint over an archive directory.
//!
//! Summary: map a request path onto the working directory, then pick what to
//! stream back: a pre-compressed sibling the client accepts, the raw file, or
//! a differently-compressed sibling decoded on the fly. HTTP wiring is left to
//! the caller; `ServeError::status_code` gives the status to answer with.

pub mod combine;
pub mod list;
pub mod read;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::types::StreamError;

pub use combine::{open_concat, open_merged};
pub use list::{list_dates, DateIndex};
pub use read::{open_for_read, resolve_path, ReadResponse};

/// Endpoint settings. Fixed once the endpoint is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    pub working_dir: PathBuf,
    /// URI prefix the endpoint is mounted under.
    pub prefix: String,
    pub content_type: String,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            prefix: "/".to_string(),
            content_type: "text/plain".to_string(),
        }
    }
}

impl ServeConfig {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self { working_dir: working_dir.into(), ..Self::default() }
    }

    /// Public link for a request path: `prefix` joined with `uri_path`.
    pub fn link(&self, uri_path: &str) -> String {
        format!("{}/{}", self.prefix.trim_end_matches('/'), uri_path.trim_start_matches('/'))
    }
}

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("cannot access {path}: outside of the working directory")]
    PathEscape { path: String },

    #[error("not found: {path}")]
    NotFound { path: String },

    #[error("cannot access {path}")]
    Forbidden { path: String },

    #[error(transparent)]
    Stream(#[from] StreamError),
}

impl ServeError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServeError::PathEscape { .. } | ServeError::Forbidden { .. } => 403,
            ServeError::NotFound { .. } => 404,
            ServeError::Stream(_) => 500,
        }
    }
}

impl From<std::io::Error> for ServeError {
    fn from(e: std::io::Error) -> Self {
        ServeError::Stream(StreamError::Io(e))
    }
}
