//! xz and lzma-alone via xz2 (liblzma), incremental family.
//!
//! Both modes decode through liblzma's auto-format decoder, so a `.lzma`
//! file holding xz data (or the reverse) still decodes.

use xz2::stream::{Action, Check, LzmaOptions, Status, Stream, CONCATENATED};

use crate::compression::codecs::ensure_spare;
use crate::compression::constants::{modes, suffixes, LEVEL_XZ};
use crate::compression::registry::CodecDescriptor;
use crate::compression::stream::{CompressStage, DecompressStage};
use crate::compression::types::{CompressionError, Compressor, Decompressor};
use crate::constants::CODEC_OUT_STEP;
use crate::stream::BoxStream;

pub struct XzCompressor {
    codec: &'static str,
    raw: Stream,
}

impl XzCompressor {
    /// `.xz` container with CRC64.
    pub fn xz() -> Result<Self, CompressionError> {
        let raw = Stream::new_easy_encoder(LEVEL_XZ, Check::Crc64)
            .map_err(|e| CompressionError::init(modes::XZ, e))?;
        Ok(Self { codec: modes::XZ, raw })
    }

    /// Legacy `.lzma` (lzma-alone) container.
    pub fn lzma() -> Result<Self, CompressionError> {
        let options = LzmaOptions::new_preset(LEVEL_XZ)
            .map_err(|e| CompressionError::init(modes::LZMA, e))?;
        let raw = Stream::new_lzma_encoder(&options)
            .map_err(|e| CompressionError::init(modes::LZMA, e))?;
        Ok(Self { codec: modes::LZMA, raw })
    }
}

impl Compressor for XzCompressor {
    fn compress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let mut pos = 0;
        while pos < input.len() {
            ensure_spare(out, CODEC_OUT_STEP);
            let before = self.raw.total_in();
            self.raw
                .process_vec(&input[pos..], out, Action::Run)
                .map_err(|e| CompressionError::process(self.codec, e))?;
            pos += (self.raw.total_in() - before) as usize;
        }
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), CompressionError> {
        loop {
            ensure_spare(out, CODEC_OUT_STEP);
            let status = self.raw
                .process_vec(&[], out, Action::Finish)
                .map_err(|e| CompressionError::process(self.codec, e))?;
            if let Status::StreamEnd = status {
                return Ok(());
            }
        }
    }
}

pub struct XzDecompressor {
    codec: &'static str,
    raw: Stream,
    seen_input: bool,
}

impl XzDecompressor {
    pub fn new(codec: &'static str) -> Result<Self, CompressionError> {
        let raw = Stream::new_auto_decoder(u64::MAX, CONCATENATED)
            .map_err(|e| CompressionError::init(codec, e))?;
        Ok(Self { codec, raw, seen_input: false })
    }
}

impl Decompressor for XzDecompressor {
    fn decompress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        self.seen_input |= !input.is_empty();
        let mut pos = 0;
        loop {
            ensure_spare(out, CODEC_OUT_STEP);
            let (in_before, out_before) = (self.raw.total_in(), out.len());
            let status = self.raw
                .process_vec(&input[pos..], out, Action::Run)
                .map_err(|e| CompressionError::corrupt(self.codec, e))?;
            let consumed = (self.raw.total_in() - in_before) as usize;
            pos += consumed;

            if let Status::StreamEnd = status {
                return Ok(());
            }
            let stalled = consumed == 0 && out.len() == out_before;
            if pos == input.len() && (out.len() < out.capacity() || stalled) {
                return Ok(());
            }
            if stalled {
                return Err(CompressionError::corrupt(self.codec, "decoder made no progress"));
            }
        }
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), CompressionError> {
        if !self.seen_input {
            return Ok(());
        }
        // Concatenated mode only reports the end once told there is no more input.
        loop {
            ensure_spare(out, CODEC_OUT_STEP);
            let out_before = out.len();
            let status = self.raw
                .process_vec(&[], out, Action::Finish)
                .map_err(|e| CompressionError::corrupt(self.codec, e))?;
            match status {
                Status::StreamEnd => return Ok(()),
                _ if out.len() == out_before => {
                    return Err(CompressionError::corrupt(self.codec, "truncated stream"));
                }
                _ => {}
            }
        }
    }
}

fn xz_compress_stage(upstream: BoxStream) -> Result<BoxStream, CompressionError> {
    Ok(Box::new(CompressStage::new(upstream, modes::XZ, Box::new(XzCompressor::xz()?))))
}

fn lzma_compress_stage(upstream: BoxStream) -> Result<BoxStream, CompressionError> {
    Ok(Box::new(CompressStage::new(upstream, modes::LZMA, Box::new(XzCompressor::lzma()?))))
}

fn xz_decompress_stage(upstream: BoxStream) -> Result<BoxStream, CompressionError> {
    Ok(Box::new(DecompressStage::new(upstream, modes::XZ, Box::new(XzDecompressor::new(modes::XZ)?))))
}

fn lzma_decompress_stage(upstream: BoxStream) -> Result<BoxStream, CompressionError> {
    Ok(Box::new(DecompressStage::new(upstream, modes::LZMA, Box::new(XzDecompressor::new(modes::LZMA)?))))
}

pub fn xz_descriptor() -> CodecDescriptor {
    CodecDescriptor {
        mode: modes::XZ,
        suffix: suffixes::XZ,
        compress: xz_compress_stage,
        decompress: xz_decompress_stage,
    }
}

pub fn lzma_descriptor() -> CodecDescriptor {
    CodecDescriptor {
        mode: modes::LZMA,
        suffix: suffixes::LZMA,
        compress: lzma_compress_stage,
        decompress: lzma_decompress_stage,
    }
}
