//! compression/types.rs
//! Algorithm identifiers, codec traits and errors.

use num_enum::TryFromPrimitive;
use thiserror::Error;

use crate::stream::packet::{PacketRead, PacketWrite};
use crate::utils::enum_name_or_hex;

/// Compression algorithm byte of the compressed data packet (RFC 4880 §9.3).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum CompressionAlgorithm {
    Uncompressed = 0,
    Zip          = 1,
    Zlib         = 2,
    BZip2        = 3,
}

impl CompressionAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            CompressionAlgorithm::Uncompressed => "none",
            CompressionAlgorithm::Zip          => "zip",
            CompressionAlgorithm::Zlib         => "zlib",
            CompressionAlgorithm::BZip2        => "bzip2",
        }
    }
}

fn algorithm_name(raw: &u8) -> String {
    enum_name_or_hex::<CompressionAlgorithm>(*raw)
}

#[derive(Debug, Error)]
pub enum CompressionError {
    /// Known algorithm without a registered codec.
    #[error("unsupported compression algorithm: {}", algorithm_name(.raw))]
    UnsupportedAlgorithm { raw: u8 },

    /// Byte that names no compression algorithm at all.
    #[error("unknown compression algorithm id {raw}")]
    UnknownAlgorithm { raw: u8 },

    #[error("invalid compression level {level} for {codec}")]
    InvalidLevel { codec: &'static str, level: u32 },

    #[error("codec {codec} failed: {msg}")]
    CodecFailed { codec: &'static str, msg: String },
}

/// Compressing side of a codec.
pub trait Compressor {
    /// Wrap `inner` so that bytes written to the result reach `inner` compressed.
    fn wrap_writer<'a>(
        &self,
        inner: Box<dyn PacketWrite + 'a>,
        level: u32,
    ) -> Result<Box<dyn PacketWrite + 'a>, CompressionError>;
}

/// Decompressing side of a codec.
pub trait Decompressor {
    /// Wrap `inner` so that reads from the result yield decompressed bytes.
    fn wrap_reader<'a>(
        &self,
        inner: Box<dyn PacketRead + 'a>,
    ) -> Result<Box<dyn PacketRead + 'a>, CompressionError>;
}

/// Both directions of one algorithm.
pub trait Codec: Compressor + Decompressor {}

impl<T: Compressor + Decompressor> Codec for T {}
