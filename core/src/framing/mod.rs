//! Packet framing for the OpenPGP subset.
//!
//! Responsibilities:
//! - Packet tag bytes (new and old format)
//! - Body length encoding/decoding, including partial lengths
//! - De-framing a packet body that spans several partial chunks
//!
//! Non-responsibilities:
//! - Cryptography
//! - Compression
//! - Context rules such as "first partial chunk >= 512 bytes" (enforced by
//!   the packet readers, which know which chunk they are looking at)

pub mod types;
pub mod encode;
pub mod decode;
pub mod body;

pub use types::{
    FrameError,
    HeaderFormat,
    PacketHeader,
    PacketLength,
    PacketTag,
};
pub use encode::*;
pub use decode::*;
pub use body::BodyReader;
