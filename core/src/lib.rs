//! pgpsym-core
//!
//! Streaming password based OpenPGP encryption (RFC 4880 subset):
//! session key packet with iterated+salted S2K, AES-256 CFB integrity
//! protected data packet with MDC, compressed and literal data packets.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

// Building blocks
pub mod framing;
pub mod headers;
pub mod crypto;
pub mod compression;
pub mod telemetry;

// Stream layers
pub mod stream;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::{CodecRegistry, CompressionAlgorithm};
    pub use crate::stream::{
        decrypt_stream, encrypt_stream, open_reader, open_writer, InputSource, LiteralReader,
        LiteralWriter, OutputSink, PacketRead, PacketWrite, StreamConfig,
    };
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::{ErrorKind, StreamError};
}
