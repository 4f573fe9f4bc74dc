//! stream/config.rs
//! Caller facing knobs for a message.

use crate::compression::CompressionAlgorithm;
use crate::constants::{session_key, DEFAULT_CHUNK_SIZE, DEFAULT_COMPRESSION_LEVEL};
use crate::types::StreamError;
use crate::utils::chunk_exponent;

#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Partial chunk size. Rounded up to a power of two in `[512, 2^30]`.
    pub chunk_size: usize,
    /// Coded S2K iteration count written into new messages.
    pub s2k_count_byte: u8,
    pub compression: CompressionAlgorithm,
    /// 0..=9 for the flate codecs.
    pub compression_level: u32,
    /// Literal packet file name, at most 255 bytes.
    pub file_name: String,
    /// Literal packet timestamp (seconds since the epoch).
    pub modified: u32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            s2k_count_byte: session_key::DEFAULT_COUNT_BYTE,
            compression: CompressionAlgorithm::Zlib,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            file_name: String::new(),
            modified: 0,
        }
    }
}

impl StreamConfig {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_s2k_count_byte(mut self, count_byte: u8) -> Self {
        self.s2k_count_byte = count_byte;
        self
    }

    pub fn with_compression(mut self, alg: CompressionAlgorithm) -> Self {
        self.compression = alg;
        self
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    pub fn with_modified(mut self, modified: u32) -> Self {
        self.modified = modified;
        self
    }

    /// Exponent of the effective chunk size.
    pub fn chunk_exponent(&self) -> u8 {
        chunk_exponent(self.chunk_size)
    }

    pub fn validate(&self) -> Result<(), StreamError> {
        if self.file_name.len() > u8::MAX as usize {
            return Err(StreamError::Validation(format!(
                "file name is {} bytes, at most 255 allowed",
                self.file_name.len()
            )));
        }
        if self.compression_level > 9 {
            return Err(StreamError::Validation(format!(
                "invalid compression level {}, must be 0..=9",
                self.compression_level
            )));
        }
        Ok(())
    }
}
