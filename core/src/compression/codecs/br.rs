//! Brotli via the `brotli` crate, incremental family.
//!
//! Uses the crate's writer adapters: both directions write into a
//! `SharedBuffer` and drain it after every chunk, which gives output per
//! pushed chunk without a pull-side reader.

use std::io::Write;
use brotli::{CompressorWriter, DecompressorWriter};

use crate::compression::constants::{modes, suffixes, BROTLI_BUFFER, BROTLI_LG_WINDOW, LEVEL_BROTLI};
use crate::compression::registry::CodecDescriptor;
use crate::compression::stream::{CompressStage, DecompressStage};
use crate::compression::types::{CompressionError, Compressor, Decompressor};
use crate::stream::{BoxStream, SharedBuffer};

pub struct BrotliCompressor {
    sink: SharedBuffer,
    writer: Option<CompressorWriter<SharedBuffer>>,
}

impl BrotliCompressor {
    pub fn new() -> Self {
        let sink = SharedBuffer::new();
        let writer = CompressorWriter::new(sink.clone(), BROTLI_BUFFER, LEVEL_BROTLI, BROTLI_LG_WINDOW);
        Self { sink, writer: Some(writer) }
    }

    fn drain(&self, out: &mut Vec<u8>) -> Result<(), CompressionError> {
        self.sink
            .drain_into(out)
            .map_err(|e| CompressionError::process(modes::BROTLI, e))
    }
}

impl Default for BrotliCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compressor for BrotliCompressor {
    fn compress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let writer = self.writer
            .as_mut()
            .ok_or_else(|| CompressionError::process(modes::BROTLI, "write after finish"))?;
        writer
            .write_all(input)
            .map_err(|e| CompressionError::process(modes::BROTLI, e))?;
        self.drain(out)
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), CompressionError> {
        if let Some(writer) = self.writer.take() {
            // into_inner finishes the stream into the shared sink.
            drop(writer.into_inner());
        }
        self.drain(out)
    }
}

pub struct BrotliDecompressor {
    sink: SharedBuffer,
    writer: Option<DecompressorWriter<SharedBuffer>>,
    seen_input: bool,
}

impl BrotliDecompressor {
    pub fn new() -> Self {
        let sink = SharedBuffer::new();
        let writer = DecompressorWriter::new(sink.clone(), BROTLI_BUFFER);
        Self { sink, writer: Some(writer), seen_input: false }
    }

    fn drain(&self, out: &mut Vec<u8>) -> Result<(), CompressionError> {
        self.sink
            .drain_into(out)
            .map_err(|e| CompressionError::process(modes::BROTLI, e))
    }
}

impl Default for BrotliDecompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Decompressor for BrotliDecompressor {
    fn decompress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        self.seen_input |= !input.is_empty();
        let writer = self.writer
            .as_mut()
            .ok_or_else(|| CompressionError::process(modes::BROTLI, "write after finish"))?;
        writer
            .write_all(input)
            .map_err(|e| CompressionError::corrupt(modes::BROTLI, e))?;
        self.drain(out)
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };
        let complete = writer.into_inner().is_ok();
        self.drain(out)?;
        if !complete && self.seen_input {
            return Err(CompressionError::corrupt(modes::BROTLI, "truncated stream"));
        }
        Ok(())
    }
}

fn compress_stage(upstream: BoxStream) -> Result<BoxStream, CompressionError> {
    Ok(Box::new(CompressStage::new(upstream, modes::BROTLI, Box::new(BrotliCompressor::new()))))
}

fn decompress_stage(upstream: BoxStream) -> Result<BoxStream, CompressionError> {
    Ok(Box::new(DecompressStage::new(upstream, modes::BROTLI, Box::new(BrotliDecompressor::new()))))
}

pub fn descriptor() -> CodecDescriptor {
    CodecDescriptor {
        mode: modes::BROTLI,
        suffix: suffixes::BROTLI,
        compress: compress_stage,
        decompress: decompress_stage,
    }
}
