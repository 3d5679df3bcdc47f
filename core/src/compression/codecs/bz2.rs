//! bzip2 via the `bzip2` crate's raw stream API, incremental family.

use bzip2::{Action, Compress, Compression, Decompress, Status};

use crate::compression::codecs::ensure_spare;
use crate::compression::constants::{modes, suffixes, BZIP2_WORK_FACTOR, LEVEL_BZIP2};
use crate::compression::registry::CodecDescriptor;
use crate::compression::stream::{CompressStage, DecompressStage};
use crate::compression::types::{CompressionError, Compressor, Decompressor};
use crate::constants::CODEC_OUT_STEP;
use crate::stream::BoxStream;

pub struct Bz2Compressor {
    raw: Compress,
}

impl Bz2Compressor {
    pub fn new() -> Self {
        Self { raw: Compress::new(Compression::new(LEVEL_BZIP2), BZIP2_WORK_FACTOR) }
    }
}

impl Default for Bz2Compressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compressor for Bz2Compressor {
    fn compress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let mut pos = 0;
        while pos < input.len() {
            ensure_spare(out, CODEC_OUT_STEP);
            let before = self.raw.total_in();
            self.raw
                .compress_vec(&input[pos..], out, Action::Run)
                .map_err(|e| CompressionError::process(modes::BZIP2, e))?;
            pos += (self.raw.total_in() - before) as usize;
        }
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), CompressionError> {
        loop {
            ensure_spare(out, CODEC_OUT_STEP);
            let status = self.raw
                .compress_vec(&[], out, Action::Finish)
                .map_err(|e| CompressionError::process(modes::BZIP2, e))?;
            if let Status::StreamEnd = status {
                return Ok(());
            }
        }
    }
}

/// Accepts concatenated bzip2 streams (`cat a.bz2 b.bz2`).
pub struct Bz2Decompressor {
    raw: Decompress,
    /// Current stream reached its end marker.
    ended: bool,
}

impl Bz2Decompressor {
    pub fn new() -> Self {
        Self { raw: Decompress::new(false), ended: false }
    }
}

impl Default for Bz2Decompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Decompressor for Bz2Decompressor {
    fn decompress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let mut pos = 0;
        loop {
            if self.ended {
                if pos == input.len() {
                    return Ok(());
                }
                self.raw = Decompress::new(false);
                self.ended = false;
            }

            ensure_spare(out, CODEC_OUT_STEP);
            let (in_before, out_before) = (self.raw.total_in(), out.len());
            let status = self.raw
                .decompress_vec(&input[pos..], out)
                .map_err(|e| CompressionError::corrupt(modes::BZIP2, e))?;
            let consumed = (self.raw.total_in() - in_before) as usize;
            pos += consumed;

            if let Status::StreamEnd = status {
                self.ended = true;
                continue;
            }
            let stalled = consumed == 0 && out.len() == out_before;
            if pos == input.len() && (out.len() < out.capacity() || stalled) {
                return Ok(());
            }
            if stalled {
                return Err(CompressionError::corrupt(modes::BZIP2, "decoder made no progress"));
            }
        }
    }

    fn finish(&mut self, _out: &mut Vec<u8>) -> Result<(), CompressionError> {
        if !self.ended && self.raw.total_in() > 0 {
            return Err(CompressionError::corrupt(modes::BZIP2, "truncated stream"));
        }
        Ok(())
    }
}

fn compress_stage(upstream: BoxStream) -> Result<BoxStream, CompressionError> {
    Ok(Box::new(CompressStage::new(upstream, modes::BZIP2, Box::new(Bz2Compressor::new()))))
}

fn decompress_stage(upstream: BoxStream) -> Result<BoxStream, CompressionError> {
    Ok(Box::new(DecompressStage::new(upstream, modes::BZIP2, Box::new(Bz2Decompressor::new()))))
}

pub fn descriptor() -> CodecDescriptor {
    CodecDescriptor {
        mode: modes::BZIP2,
        suffix: suffixes::BZIP2,
        compress: compress_stage,
        decompress: decompress_stage,
    }
}
