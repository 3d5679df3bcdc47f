//! logarchive-core
//!
//! Pure Rust streaming compression engine for time-partitioned log archives.
//! Streams, codec stages, auto-detect pipeline and k-way line merge.
//! No async runtime, no FFI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod config;
pub mod constants;
pub mod types;
pub mod utils;

// Shared and top level module
pub mod compression;
pub mod telemetry;

// Stream layers
pub mod stream;

// Collaborators built on the stream layer
pub mod benchmark;
pub mod filetree;
pub mod serve;
pub mod storage;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::{registry, CodecRegistry, CompressionError};
    pub use crate::stream::{
        auto_compress_stream, lines, merge_lines, read_all, BoxStream, ByteStream, MemoryStream,
        MergeStream, PipelineBuilder, ReaderStream, StreamReader,
    };
    pub use crate::types::StreamError;
}
