//! compression/types.rs
//! Codec error type and the incremental compressor/decompressor traits.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("unknown compression mode: {mode}")]
    UnknownMode { mode: String },

    #[error("codec already registered: mode={mode} suffix={suffix:?}")]
    DuplicateCodec { mode: String, suffix: String },

    #[error("mode name is reserved: {mode}")]
    ReservedMode { mode: String },

    #[error("codec {codec} init failed: {msg}")]
    CodecInitFailed { codec: String, msg: String },

    #[error("corrupt {codec} stream: {msg}")]
    CorruptStream { codec: String, msg: String },

    #[error("codec {codec} process failed: {msg}")]
    CodecProcessFailed { codec: String, msg: String },
}

impl CompressionError {
    pub fn corrupt(codec: &str, msg: impl ToString) -> Self {
        CompressionError::CorruptStream { codec: codec.into(), msg: msg.to_string() }
    }

    pub fn process(codec: &str, msg: impl ToString) -> Self {
        CompressionError::CodecProcessFailed { codec: codec.into(), msg: msg.to_string() }
    }

    pub fn init(codec: &str, msg: impl ToString) -> Self {
        CompressionError::CodecInitFailed { codec: codec.into(), msg: msg.to_string() }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, CompressionError::CorruptStream { .. })
    }
}

// Require Send so trait objects can cross thread boundaries.
pub trait Compressor: Send {
    /// Compress one upstream chunk, appending whatever output is ready to `out`.
    fn compress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError>;
    /// Flush pending state. Called once, after the last chunk.
    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), CompressionError>;
}

pub trait Decompressor: Send {
    /// Decompress one upstream chunk, appending decoded bytes to `out`.
    fn decompress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError>;
    /// Called once at upstream EOF; rejects truncated input.
    fn finish(&mut self, _out: &mut Vec<u8>) -> Result<(), CompressionError> {
        Ok(())
    }
}
