//! compression/mod.rs
//! Streaming compression and decompression stages over interchangeable codecs.
//!
//! Notes:
//! - Each codec wraps a library primitive; no algorithm is implemented here.
//! - Stage behaviour (whole-buffer filter vs incremental compress/flush) is
//!   fixed by the stage family, not by codec identity.
//! - The registry maps mode names and file suffixes to stage constructors and
//!   is read-only once built.

pub mod constants;
pub mod types;
pub mod registry;
pub mod codecs;
pub mod stream;

pub use constants::*;
pub use types::*;
pub use registry::*;
pub use stream::{CompressStage, DecompressStage, FilterStage};
