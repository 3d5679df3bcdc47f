use std::io;
use thiserror::Error;

use crate::{compression::CompressionError, storage::StorageError};

/// Unified stream error covering I/O, codec, storage and generic validation.
/// - `From<T>` impls enable `?` across the pipeline.
/// - `Corrupt` carries the source identifier once a decode stage has been
///   attached by the pipeline builder.
#[derive(Debug, Error)]
pub enum StreamError {
    /// I/O error from a file, reader or writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Compression/decompression error without source context.
    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    /// Codec rejected the input of a named source.
    #[error("{name}: {error}")]
    Corrupt {
        name: String,
        #[source]
        error: CompressionError,
    },

    /// Line-oriented stage met bytes that are not UTF-8.
    #[error("invalid UTF-8 in line: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Object store failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Pipeline plumbing failure (worker thread, channel).
    #[error("pipeline error: {0}")]
    Pipeline(&'static str),

    /// Generic high-level validation with a descriptive message.
    #[error("validation error: {0}")]
    Validation(String),
}

impl StreamError {
    /// True when a codec rejected malformed input.
    pub fn is_corrupt(&self) -> bool {
        match self {
            StreamError::Corrupt { .. } => true,
            StreamError::Compression(e) => e.is_corrupt(),
            _ => false,
        }
    }

    /// Attach a source identifier to corrupt-input errors; others pass through.
    pub fn with_source(self, name: &str) -> Self {
        match self {
            StreamError::Compression(error) if error.is_corrupt() => StreamError::Corrupt {
                name: name.to_string(),
                error,
            },
            other => other,
        }
    }
}

impl From<StreamError> for io::Error {
    fn from(e: StreamError) -> Self {
        match e {
            StreamError::Io(inner) => inner,
            other @ StreamError::Utf8(_) => io::Error::new(io::ErrorKind::InvalidData, other),
            other if other.is_corrupt() => io::Error::new(io::ErrorKind::InvalidData, other),
            other => io::Error::other(other),
        }
    }
}
