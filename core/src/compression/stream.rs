//! compression/stream.rs
//! Transform stages wrapping one codec over an upstream byte stream.
//!
//! Two families:
//! - `FilterStage`: drains the upstream, applies a buffer-in/buffer-out
//!   function, yields exactly one chunk.
//! - `CompressStage` / `DecompressStage`: feed each upstream chunk through an
//!   incremental codec and yield its output as it arrives.

use bytes::Bytes;
use tracing::debug;

use crate::compression::types::{CompressionError, Compressor, Decompressor};
use crate::stream::{read_all, ByteStream};
use crate::types::StreamError;

/// Buffer-in/buffer-out codec primitive.
pub type FilterFn = fn(&[u8]) -> Result<Vec<u8>, CompressionError>;

/// Whole-buffer stage. Memory cost is O(upstream size).
pub struct FilterStage<S> {
    upstream: S,
    codec: &'static str,
    filter: FilterFn,
    done: bool,
}

impl<S: ByteStream> FilterStage<S> {
    pub fn new(upstream: S, codec: &'static str, filter: FilterFn) -> Self {
        Self { upstream, codec, filter, done: false }
    }
}

impl<S: ByteStream> ByteStream for FilterStage<S> {
    fn next_chunk(&mut self) -> Result<Option<Bytes>, StreamError> {
        if self.done {
            return Ok(None);
        }
        self.done = true;

        let input = read_all(&mut self.upstream)?;
        let output = (self.filter)(&input)?;
        debug!(codec = self.codec, input = input.len(), output = output.len(), "filter");
        Ok(Some(Bytes::from(output)))
    }
}

/// Incremental compression stage.
/// - One output chunk per upstream chunk (possibly empty).
/// - The flush remainder is always the final chunk, emitted after upstream EOF.
pub struct CompressStage<S> {
    upstream: S,
    codec: &'static str,
    compressor: Box<dyn Compressor>,
    flushed: bool,
}

impl<S: ByteStream> CompressStage<S> {
    pub fn new(upstream: S, codec: &'static str, compressor: Box<dyn Compressor>) -> Self {
        Self { upstream, codec, compressor, flushed: false }
    }
}

impl<S: ByteStream> ByteStream for CompressStage<S> {
    fn next_chunk(&mut self) -> Result<Option<Bytes>, StreamError> {
        if self.flushed {
            return Ok(None);
        }

        let mut out = Vec::new();
        match self.upstream.next_chunk()? {
            Some(chunk) => {
                self.compressor.compress_chunk(&chunk, &mut out)?;
                debug!(codec = self.codec, input = chunk.len(), output = out.len(), "compress");
            }
            None => {
                self.flushed = true;
                self.compressor.finish(&mut out)?;
                debug!(codec = self.codec, output = out.len(), "flush");
            }
        }
        Ok(Some(Bytes::from(out)))
    }
}

/// Incremental decompression stage.
/// - Decoded bytes are yielded as each upstream chunk arrives.
/// - At upstream EOF the codec may reject truncated input; any trailing
///   output is emitted only when non-empty.
pub struct DecompressStage<S> {
    upstream: S,
    codec: &'static str,
    decompressor: Box<dyn Decompressor>,
    done: bool,
}

impl<S: ByteStream> DecompressStage<S> {
    pub fn new(upstream: S, codec: &'static str, decompressor: Box<dyn Decompressor>) -> Self {
        Self { upstream, codec, decompressor, done: false }
    }
}

impl<S: ByteStream> ByteStream for DecompressStage<S> {
    fn next_chunk(&mut self) -> Result<Option<Bytes>, StreamError> {
        if self.done {
            return Ok(None);
        }

        let mut out = Vec::new();
        match self.upstream.next_chunk()? {
            Some(chunk) => {
                self.decompressor.decompress_chunk(&chunk, &mut out)?;
                debug!(codec = self.codec, input = chunk.len(), output = out.len(), "decompress");
                Ok(Some(Bytes::from(out)))
            }
            None => {
                self.done = true;
                self.decompressor.finish(&mut out)?;
                if out.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Bytes::from(out)))
                }
            }
        }
    }
}
