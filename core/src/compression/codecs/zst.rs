//! Zstandard via the `zstd` crate, whole-buffer family.

use crate::compression::constants::{modes, suffixes, LEVEL_ZSTD};
use crate::compression::registry::CodecDescriptor;
use crate::compression::stream::FilterStage;
use crate::compression::types::CompressionError;
use crate::stream::BoxStream;

pub fn compress(input: &[u8]) -> Result<Vec<u8>, CompressionError> {
    ::zstd::stream::encode_all(input, LEVEL_ZSTD)
        .map_err(|e| CompressionError::process(modes::ZSTD, e))
}

pub fn decompress(input: &[u8]) -> Result<Vec<u8>, CompressionError> {
    ::zstd::stream::decode_all(input)
        .map_err(|e| CompressionError::corrupt(modes::ZSTD, e))
}

fn compress_stage(upstream: BoxStream) -> Result<BoxStream, CompressionError> {
    Ok(Box::new(FilterStage::new(upstream, modes::ZSTD, compress)))
}

fn decompress_stage(upstream: BoxStream) -> Result<BoxStream, CompressionError> {
    Ok(Box::new(FilterStage::new(upstream, modes::ZSTD, decompress)))
}

pub fn descriptor() -> CodecDescriptor {
    CodecDescriptor {
        mode: modes::ZSTD,
        suffix: suffixes::ZSTD,
        compress: compress_stage,
        decompress: decompress_stage,
    }
}
