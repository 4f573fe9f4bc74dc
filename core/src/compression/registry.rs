//! compression/registry.rs
//! Algorithm to codec resolution.

use std::collections::HashMap;
use std::sync::Arc;

use crate::compression::codecs::{FlateCodec, FlateFormat, PassThrough};
use crate::compression::types::{Codec, CompressionAlgorithm, CompressionError};

/// Maps algorithm ids to codecs. Cheap to clone.
#[derive(Clone)]
pub struct CodecRegistry {
    codecs: HashMap<CompressionAlgorithm, Arc<dyn Codec + Send + Sync>>,
}

impl CodecRegistry {
    /// Registry without any codec.
    pub fn empty() -> Self {
        Self { codecs: HashMap::new() }
    }

    /// `Uncompressed`, `Zip` and `Zlib` registered.
    pub fn with_defaults() -> Self {
        let mut r = Self::empty();
        r.register(CompressionAlgorithm::Uncompressed, PassThrough);
        r.register(CompressionAlgorithm::Zip, FlateCodec::new(FlateFormat::Raw));
        r.register(CompressionAlgorithm::Zlib, FlateCodec::new(FlateFormat::Zlib));
        r
    }

    /// Add or replace the codec for `alg`.
    pub fn register<C>(&mut self, alg: CompressionAlgorithm, codec: C)
    where
        C: Codec + Send + Sync + 'static,
    {
        self.codecs.insert(alg, Arc::new(codec));
    }

    pub fn is_registered(&self, alg: CompressionAlgorithm) -> bool {
        self.codecs.contains_key(&alg)
    }

    pub fn resolve(&self, alg: CompressionAlgorithm) -> Result<&(dyn Codec + Send + Sync), CompressionError> {
        self.codecs
            .get(&alg)
            .map(|c| c.as_ref())
            .ok_or(CompressionError::UnsupportedAlgorithm { raw: alg as u8 })
    }

    /// Resolve a raw algorithm byte as read from a compressed packet.
    pub fn resolve_raw(&self, raw: u8) -> Result<&(dyn Codec + Send + Sync), CompressionError> {
        let alg = CompressionAlgorithm::try_from(raw)
            .map_err(|_| CompressionError::UnknownAlgorithm { raw })?;
        self.resolve(alg)
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.codecs.keys().map(|a| a.name()).collect();
        names.sort_unstable();
        f.debug_struct("CodecRegistry").field("codecs", &names).finish()
    }
}
