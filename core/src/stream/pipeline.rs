//! stream/pipeline.rs
//! Auto-detect pipeline builder.
//!
//! Summary: infer the current encoding from a name's suffix, decode it if it
//! differs from the requested mode, then encode to the requested mode and
//! report the resulting name. The name is advisory; nothing is renamed.

use bytes::Bytes;
use tracing::{debug, warn};

use crate::compression::constants::modes;
use crate::compression::registry::{registry, CodecRegistry};
use crate::constants::DEFAULT_READ_CHUNK_SIZE;
use crate::stream::core::{BoxStream, ByteStream};
use crate::stream::io::ReaderStream;
use crate::types::StreamError;
use crate::utils::split_ext;

#[derive(Debug, Clone, Copy)]
pub struct PipelineBuilder<'r> {
    registry: &'r CodecRegistry,
    chunk_size: usize,
}

impl Default for PipelineBuilder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineBuilder<'static> {
    /// Builder over the process-wide built-in registry.
    pub fn new() -> Self {
        Self::with_registry(registry())
    }
}

impl<'r> PipelineBuilder<'r> {
    pub fn with_registry(registry: &'r CodecRegistry) -> Self {
        Self { registry, chunk_size: DEFAULT_READ_CHUNK_SIZE }
    }

    /// Chunk size used when the builder opens the file itself.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn registry(&self) -> &'r CodecRegistry {
        self.registry
    }

    /// Build `(resulting_name, stream)` for `name` converted to `mode`.
    ///
    /// - `raw`: name and stream returned untouched.
    /// - suffix already matches `mode`: untouched, so repeated runs are no-ops.
    /// - `decompress`: decode the detected encoding only.
    /// - unregistered mode: logged and treated as `decompress`.
    pub fn build(
        &self,
        name: &str,
        mode: &str,
        source: Option<BoxStream>,
    ) -> Result<(String, BoxStream), StreamError> {
        let mut stream = match source {
            Some(s) => s,
            None => Box::new(ReaderStream::open(name, self.chunk_size)?),
        };

        if mode == modes::RAW {
            return Ok((name.to_string(), stream));
        }

        let (base, ext) = split_ext(name);
        let mut working = name;
        if let Some(current) = self.registry.lookup_by_suffix(ext) {
            if current.mode == mode {
                debug!(name, mode, "already encoded, unchanged");
                return Ok((name.to_string(), stream));
            }
            debug!(name, codec = current.mode, "decode stage");
            let decoded = current.decompress_stage(stream)?;
            stream = Box::new(SourceLabel { inner: decoded, name: name.to_string() });
            working = base;
        }

        if mode == modes::DECOMPRESS {
            return Ok((working.to_string(), stream));
        }

        match self.registry.lookup_by_mode(mode) {
            Some(target) => {
                debug!(name, codec = target.mode, "encode stage");
                let encoded = target.compress_stage(stream)?;
                Ok((format!("{working}{}", target.suffix), encoded))
            }
            None => {
                warn!(name, mode, "unknown compression mode, decompressing only");
                Ok((working.to_string(), stream))
            }
        }
    }

    /// `build` over an in-memory buffer.
    pub fn build_bytes(
        &self,
        name: &str,
        mode: &str,
        data: impl Into<Bytes>,
    ) -> Result<(String, BoxStream), StreamError> {
        let source = crate::stream::io::MemoryStream::with_chunk_size(data, self.chunk_size);
        self.build(name, mode, Some(Box::new(source)))
    }
}

/// `PipelineBuilder::new().build(..)` over the built-in registry.
pub fn auto_compress_stream(
    name: &str,
    mode: &str,
    source: Option<BoxStream>,
) -> Result<(String, BoxStream), StreamError> {
    PipelineBuilder::new().build(name, mode, source)
}

/// Tags corrupt-input errors from a decode stage with the source name.
struct SourceLabel {
    inner: BoxStream,
    name: String,
}

impl ByteStream for SourceLabel {
    fn next_chunk(&mut self) -> Result<Option<Bytes>, StreamError> {
        self.inner
            .next_chunk()
            .map_err(|e| e.with_source(&self.name))
    }
}
