//! stream/reader.rs
//! Sized-read adapter: exposes a `ByteStream` as `std::io::Read`.

use std::io::{self, Read};

use bytes::{Bytes, BytesMut};

use crate::stream::core::ByteStream;
use crate::types::StreamError;

/// Accumulates chunks in a rolling buffer and slices reads from it.
pub struct StreamReader<S> {
    upstream: S,
    buf: BytesMut,
    eof: bool,
}

impl<S: ByteStream> StreamReader<S> {
    pub fn new(upstream: S) -> Self {
        Self { upstream, buf: BytesMut::new(), eof: false }
    }

    /// Pull chunks until at least `want` bytes are buffered (all of them when
    /// `None`) or the upstream ends.
    fn fill(&mut self, want: Option<usize>) -> Result<(), StreamError> {
        while !self.eof && want.map_or(true, |n| self.buf.len() < n) {
            match self.upstream.next_chunk()? {
                Some(chunk) => self.buf.extend_from_slice(&chunk),
                None => self.eof = true,
            }
        }
        Ok(())
    }

    /// Read up to `size` bytes; `None` reads everything remaining.
    /// A short result means end of stream.
    pub fn read_sized(&mut self, size: Option<usize>) -> Result<Bytes, StreamError> {
        self.fill(size)?;
        let n = size.map_or(self.buf.len(), |n| n.min(self.buf.len()));
        Ok(self.buf.split_to(n).freeze())
    }

    /// True once the upstream has ended and the buffer is drained.
    pub fn is_eof(&self) -> bool {
        self.eof && self.buf.is_empty()
    }

    pub fn into_inner(self) -> S {
        self.upstream
    }
}

impl<S: ByteStream> Read for StreamReader<S> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }
        self.fill(Some(1))?;
        let n = out.len().min(self.buf.len());
        out[..n].copy_from_slice(&self.buf.split_to(n));
        Ok(n)
    }
}
