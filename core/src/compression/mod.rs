//! compression/mod.rs
//! Codecs for the compressed data packet (tag 8).
//!
//! Notes:
//! - Codecs are stream filters: they wrap a packet layer and return a packet layer.
//! - The registry resolves the algorithm byte to a codec. ZIP (raw deflate)
//!   and ZLIB are built in; BZip2 is resolved only if the caller registers one.

pub mod types;
pub mod registry;
pub mod codecs;

pub use types::*;
pub use registry::*;
