//! storage/mod.rs
//! Object-store collaborator: an opaque key/blob store the pipeline reads
//! from and writes into.
//!
//! - `BlobStore` is the interface; pagination is the store's concern.
//! - `MemoryBlobStore` backs tests, `DirBlobStore` maps keys onto a directory.
//! - `ops` holds the helpers built on top: full listing, streamed put, du.

pub mod types;
pub mod memory;
pub mod dir;
pub mod ops;

pub use types::*;
pub use memory::MemoryBlobStore;
pub use dir::DirBlobStore;
pub use ops::*;
