//! headers/mod.rs
//! Symmetric-Key Encrypted Session Key packet (tag 3), the fixed 15 byte
//! header that opens every message.
//!
//! Notes:
//! - Only version 4, iterated+salted S2K, AES-256 and SHA-256 are accepted.
//! - The packet carries no encrypted session key; the S2K output is the
//!   message key directly.
//! - Old (`0x8C`) and new (`0xC3`) header bytes are both accepted when reading;
//!   writers always emit the new format.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
