//! gzip via flate2, whole-buffer family.
//!
//! `gzip-fast` shares the decoder and has no suffix, so it is reachable only
//! by explicit mode and its output is detected as plain `.gz`.

use std::io::{Read, Write};
use flate2::{read::MultiGzDecoder, write::GzEncoder, Compression};

use crate::compression::constants::{modes, suffixes, LEVEL_GZIP, LEVEL_GZIP_FAST};
use crate::compression::registry::CodecDescriptor;
use crate::compression::stream::FilterStage;
use crate::compression::types::CompressionError;
use crate::stream::BoxStream;

fn encode(input: &[u8], level: u32) -> Result<Vec<u8>, CompressionError> {
    let mut enc = GzEncoder::new(Vec::with_capacity(input.len() / 4 + 64), Compression::new(level));
    enc.write_all(input)
        .map_err(|e| CompressionError::process(modes::GZIP, e))?;
    enc.finish()
        .map_err(|e| CompressionError::process(modes::GZIP, e))
}

pub fn compress(input: &[u8]) -> Result<Vec<u8>, CompressionError> {
    encode(input, LEVEL_GZIP)
}

pub fn compress_fast(input: &[u8]) -> Result<Vec<u8>, CompressionError> {
    encode(input, LEVEL_GZIP_FAST)
}

/// Decodes concatenated gzip members, as `gzip -d` does.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut out = Vec::with_capacity(input.len() * 4);
    MultiGzDecoder::new(input)
        .read_to_end(&mut out)
        .map_err(|e| CompressionError::corrupt(modes::GZIP, e))?;
    Ok(out)
}

fn compress_stage(upstream: BoxStream) -> Result<BoxStream, CompressionError> {
    Ok(Box::new(FilterStage::new(upstream, modes::GZIP, compress)))
}

fn compress_fast_stage(upstream: BoxStream) -> Result<BoxStream, CompressionError> {
    Ok(Box::new(FilterStage::new(upstream, modes::GZIP_FAST, compress_fast)))
}

fn decompress_stage(upstream: BoxStream) -> Result<BoxStream, CompressionError> {
    Ok(Box::new(FilterStage::new(upstream, modes::GZIP, decompress)))
}

pub fn descriptor() -> CodecDescriptor {
    CodecDescriptor {
        mode: modes::GZIP,
        suffix: suffixes::GZIP,
        compress: compress_stage,
        decompress: decompress_stage,
    }
}

pub fn fast_descriptor() -> CodecDescriptor {
    CodecDescriptor {
        mode: modes::GZIP_FAST,
        suffix: suffixes::NONE,
        compress: compress_fast_stage,
        decompress: decompress_stage,
    }
}
