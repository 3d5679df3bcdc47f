//! compression/codecs/mod.rs
//! Concrete codec bindings and the built-in capability table.
//!
//! Optional codecs are compiled in only when their cargo feature is on.

pub mod gzip;
pub mod bz2;
pub mod xz;
#[cfg(feature = "zstd")]
pub mod zst;
#[cfg(feature = "lz4")]
pub mod lz4;
#[cfg(feature = "brotli")]
pub mod br;

use crate::compression::constants::{modes, suffixes};
use crate::compression::registry::CodecDescriptor;
use crate::compression::types::CompressionError;
use crate::stream::BoxStream;

fn identity(upstream: BoxStream) -> Result<BoxStream, CompressionError> {
    Ok(upstream)
}

/// `pass`: registered no-op, listed among modes, never auto-detected.
pub fn pass() -> CodecDescriptor {
    CodecDescriptor {
        mode: modes::PASS,
        suffix: suffixes::NONE,
        compress: identity,
        decompress: identity,
    }
}

/// Every codec available in this build, in listing order.
pub fn builtin() -> Vec<CodecDescriptor> {
    #[allow(unused_mut)]
    let mut table = vec![
        pass(),
        gzip::descriptor(),
        gzip::fast_descriptor(),
        bz2::descriptor(),
        xz::xz_descriptor(),
        xz::lzma_descriptor(),
    ];
    #[cfg(feature = "zstd")]
    table.push(zst::descriptor());
    #[cfg(feature = "lz4")]
    table.push(lz4::descriptor());
    #[cfg(feature = "brotli")]
    table.push(br::descriptor());
    table
}

/// Make sure `out` has at least `n` bytes of spare capacity for codecs that
/// only write into uninitialised tail space.
pub(crate) fn ensure_spare(out: &mut Vec<u8>, n: usize) {
    if out.capacity() - out.len() < n {
        out.reserve(n);
    }
}
