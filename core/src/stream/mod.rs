//! stream/mod.rs
//! Pull-based chunked byte streams and the operations derived from them.
//!
//! Notes:
//! - Every stage implements the single `ByteStream::next_chunk` primitive;
//!   `read_all`, `lines` and `StreamReader` are written once on top of it.
//! - Each stage owns its upstream. Nothing runs until the consumer pulls,
//!   except behind an explicit `Prefetch`.

pub mod core;
pub mod io;
pub mod lines;
pub mod merge;
pub mod pipeline;
pub mod prefetch;
pub mod reader;

pub use self::core::{read_all, BoxStream, ByteStream, CatStream};
pub use self::io::{drain_to, open_input, open_output, InputSource, MemoryStream, OutputSink, ReaderStream, SharedBuffer};
pub use self::lines::{lines, Lines};
pub use self::merge::{merge_lines, MergeLines, MergeStream};
pub use self::pipeline::{auto_compress_stream, PipelineBuilder};
pub use self::prefetch::Prefetch;
pub use self::reader::StreamReader;
