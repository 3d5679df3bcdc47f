//! LZ4 frame format via lz4_flex, whole-buffer family.
//! Output is interoperable with the `lz4` command line tool.

use std::io::{Read, Write};
use lz4_flex::frame::{FrameDecoder, FrameEncoder};

use crate::compression::constants::{modes, suffixes};
use crate::compression::registry::CodecDescriptor;
use crate::compression::stream::FilterStage;
use crate::compression::types::CompressionError;
use crate::stream::BoxStream;

pub fn compress(input: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut enc = FrameEncoder::new(Vec::with_capacity(input.len() / 2 + 64));
    enc.write_all(input)
        .map_err(|e| CompressionError::process(modes::LZ4, e))?;
    enc.finish()
        .map_err(|e| CompressionError::process(modes::LZ4, e))
}

pub fn decompress(input: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut out = Vec::with_capacity(input.len() * 2);
    FrameDecoder::new(input)
        .read_to_end(&mut out)
        .map_err(|e| CompressionError::corrupt(modes::LZ4, e))?;
    Ok(out)
}

fn compress_stage(upstream: BoxStream) -> Result<BoxStream, CompressionError> {
    Ok(Box::new(FilterStage::new(upstream, modes::LZ4, compress)))
}

fn decompress_stage(upstream: BoxStream) -> Result<BoxStream, CompressionError> {
    Ok(Box::new(FilterStage::new(upstream, modes::LZ4, decompress)))
}

pub fn descriptor() -> CodecDescriptor {
    CodecDescriptor {
        mode: modes::LZ4,
        suffix: suffixes::LZ4,
        compress: compress_stage,
        decompress: decompress_stage,
    }
}
