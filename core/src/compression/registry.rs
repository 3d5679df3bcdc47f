//! compression/registry.rs
//! Codec registry: mode name <-> file suffix <-> stage constructors.
//!
//! Summary: a capability table built once at startup. Codecs behind a
//! disabled cargo feature are absent, and asking for them is `UnknownMode`.

use std::sync::OnceLock;

use crate::compression::codecs;
use crate::compression::constants::modes;
use crate::compression::types::CompressionError;
use crate::stream::BoxStream;

/// Wraps an upstream stream in one codec's compress or decompress stage.
pub type StageCtor = fn(BoxStream) -> Result<BoxStream, CompressionError>;

/// Immutable codec record.
#[derive(Debug, Clone, Copy)]
pub struct CodecDescriptor {
    pub mode: &'static str,
    /// File suffix with leading dot; empty means explicit-mode only.
    pub suffix: &'static str,
    pub compress: StageCtor,
    pub decompress: StageCtor,
}

impl CodecDescriptor {
    pub fn compress_stage(&self, upstream: BoxStream) -> Result<BoxStream, CompressionError> {
        (self.compress)(upstream)
    }

    pub fn decompress_stage(&self, upstream: BoxStream) -> Result<BoxStream, CompressionError> {
        (self.decompress)(upstream)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CodecRegistry {
    codecs: Vec<CodecDescriptor>,
}

impl CodecRegistry {
    /// Empty registry; see `builtin()` for the default codec table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every codec compiled into this build.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for desc in codecs::builtin() {
            // Built-in table has unique modes and suffixes.
            if let Err(e) = registry.register(desc) {
                tracing::error!(error = %e, "builtin codec rejected");
            }
        }
        registry
    }

    /// Add a codec. Mode names are unique, and so are non-empty suffixes.
    pub fn register(&mut self, desc: CodecDescriptor) -> Result<(), CompressionError> {
        if desc.mode == modes::RAW || desc.mode == modes::DECOMPRESS {
            return Err(CompressionError::ReservedMode { mode: desc.mode.into() });
        }
        let clash = self.codecs.iter().any(|c| {
            c.mode == desc.mode || (!desc.suffix.is_empty() && c.suffix == desc.suffix)
        });
        if clash {
            return Err(CompressionError::DuplicateCodec {
                mode: desc.mode.into(),
                suffix: desc.suffix.into(),
            });
        }
        self.codecs.push(desc);
        Ok(())
    }

    pub fn lookup_by_mode(&self, mode: &str) -> Option<&CodecDescriptor> {
        self.codecs.iter().find(|c| c.mode == mode)
    }

    /// Empty suffixes never match: those codecs are reachable by mode only.
    pub fn lookup_by_suffix(&self, suffix: &str) -> Option<&CodecDescriptor> {
        if suffix.is_empty() {
            return None;
        }
        self.codecs.iter().find(|c| c.suffix == suffix)
    }

    pub fn resolve(&self, mode: &str) -> Result<&CodecDescriptor, CompressionError> {
        self.lookup_by_mode(mode)
            .ok_or_else(|| CompressionError::UnknownMode { mode: mode.into() })
    }

    pub fn is_available(&self, mode: &str) -> bool {
        self.lookup_by_mode(mode).is_some()
    }

    /// Accepts registered modes plus the `raw` and `decompress` pseudo-modes.
    pub fn validate_mode(&self, mode: &str) -> Result<(), CompressionError> {
        if mode == modes::RAW || mode == modes::DECOMPRESS || self.is_available(mode) {
            Ok(())
        } else {
            Err(CompressionError::UnknownMode { mode: mode.into() })
        }
    }

    /// Mode vocabulary: registered codecs in registration order, then
    /// `decompress` and `raw`.
    pub fn compress_modes(&self) -> Vec<&'static str> {
        self.codecs
            .iter()
            .map(|c| c.mode)
            .chain([modes::DECOMPRESS, modes::RAW])
            .collect()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &CodecDescriptor> {
        self.codecs.iter()
    }
}

/// Process-wide read-only registry of the built-in codecs.
pub fn registry() -> &'static CodecRegistry {
    static REGISTRY: OnceLock<CodecRegistry> = OnceLock::new();
    REGISTRY.get_or_init(CodecRegistry::builtin)
}
