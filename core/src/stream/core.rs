//! stream/core.rs
//! The `ByteStream` trait and stream-agnostic helpers.

use std::collections::VecDeque;

use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::types::StreamError;

/// Finite, ordered, single-pass sequence of byte chunks.
///
/// - `Ok(None)` marks end of stream and is sticky: every later call also
///   returns `Ok(None)`.
/// - Chunk boundaries carry no meaning; empty chunks are allowed.
/// - An error aborts the stream; callers must not keep pulling.
pub trait ByteStream: Send {
    fn next_chunk(&mut self) -> Result<Option<Bytes>, StreamError>;
}

pub type BoxStream = Box<dyn ByteStream>;

impl<S: ByteStream + ?Sized> ByteStream for Box<S> {
    fn next_chunk(&mut self) -> Result<Option<Bytes>, StreamError> {
        (**self).next_chunk()
    }
}

/// Drain a stream to completion, concatenating every chunk.
/// O(total size) memory; a single-chunk stream is returned without copying.
pub fn read_all<S: ByteStream + ?Sized>(stream: &mut S) -> Result<Bytes, StreamError> {
    let mut first: Option<Bytes> = None;
    let mut acc = BytesMut::new();

    while let Some(chunk) = stream.next_chunk()? {
        debug!(len = chunk.len(), "read");
        match first.take() {
            None if acc.is_empty() => first = Some(chunk),
            prev => {
                if let Some(prev) = prev {
                    acc.extend_from_slice(&prev);
                }
                acc.extend_from_slice(&chunk);
            }
        }
    }

    Ok(match first {
        Some(only) => only,
        None => acc.freeze(),
    })
}

/// Concatenation of several streams, in order.
pub struct CatStream {
    streams: VecDeque<BoxStream>,
}

impl CatStream {
    pub fn new(streams: impl IntoIterator<Item = BoxStream>) -> Self {
        Self { streams: streams.into_iter().collect() }
    }
}

impl ByteStream for CatStream {
    fn next_chunk(&mut self) -> Result<Option<Bytes>, StreamError> {
        while let Some(current) = self.streams.front_mut() {
            match current.next_chunk()? {
                Some(chunk) => return Ok(Some(chunk)),
                None => {
                    self.streams.pop_front();
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::MemoryStream;

    #[test]
    fn read_all_joins_chunks() {
        let mut s = MemoryStream::with_chunk_size(Bytes::from_static(b"hello world"), 3);
        assert_eq!(read_all(&mut s).unwrap(), Bytes::from_static(b"hello world"));
        // EOF is sticky
        assert!(s.next_chunk().unwrap().is_none());
    }

    #[test]
    fn cat_preserves_order_and_skips_empty() {
        let parts: Vec<BoxStream> = vec![
            Box::new(MemoryStream::with_chunk_size(Bytes::from_static(b"ab"), 1)),
            Box::new(MemoryStream::new(Bytes::new())),
            Box::new(MemoryStream::new(Bytes::from_static(b"cd"))),
        ];
        let mut cat = CatStream::new(parts);
        assert_eq!(read_all(&mut cat).unwrap(), Bytes::from_static(b"abcd"));
    }
}
