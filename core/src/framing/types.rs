use std::fmt;
use std::io;
use num_enum::TryFromPrimitive;
use thiserror::Error;

use crate::constants::tags;

/// Packet types handled by this crate.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
pub enum PacketTag {
    SessionKey                = tags::SESSION_KEY,
    CompressedData            = tags::COMPRESSED_DATA,
    LiteralData               = tags::LITERAL_DATA,
    EncryptedIntegrityData    = tags::ENCRYPTED_INTEGRITY_DATA,
    ModificationDetectionCode = tags::MODIFICATION_DETECTION_CODE,
}

impl PacketTag {
    /// Old format headers only carry four tag bits.
    pub const fn fits_old_format(self) -> bool {
        (self as u8) < 16
    }
}

/// Header layout, chosen by bit 6 of the tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFormat {
    /// `0b11tttttt`, lengths per RFC 4880 §4.2.2.
    New,
    /// `0b10ttttll`, `ll` selects the length field size.
    Old { length_type: u8 },
}

/// Body length of a packet or of one chunk of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketLength {
    /// Exact length; ends the packet.
    Definite(u64),
    /// `2^power` bytes follow, then another length header.
    Partial(u8),
    /// Old format length type 3: the body runs to the end of the stream.
    Indeterminate,
}

impl PacketLength {
    /// Bytes in this chunk, if known.
    pub fn chunk_len(&self) -> Option<u64> {
        match *self {
            PacketLength::Definite(n) => Some(n),
            PacketLength::Partial(p) => Some(1u64 << p),
            PacketLength::Indeterminate => None,
        }
    }

    /// Header bytes in the shortest new format encoding.
    pub fn encoded_len(&self) -> usize {
        match *self {
            PacketLength::Definite(n) if n < 192 => 1,
            PacketLength::Definite(n) if n < 8384 => 2,
            PacketLength::Definite(_) => 5,
            PacketLength::Partial(_) => 1,
            PacketLength::Indeterminate => 0,
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, PacketLength::Partial(_))
    }
}

/// A decoded packet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    pub tag: PacketTag,
    pub format: HeaderFormat,
    pub length: PacketLength,
}

#[derive(Debug, Error)]
pub enum FrameError {
    /// Tag byte without the mandatory high bit.
    #[error("invalid packet tag byte: 0x{0:02x}")]
    InvalidTagByte(u8),

    #[error("unexpected packet: expected {expected:?}, got tag byte 0x{actual:02x}")]
    UnexpectedTag { expected: PacketTag, actual: u8 },

    #[error("invalid old format length type: {0}")]
    InvalidLengthType(u8),

    #[error("first partial chunk must be at least {min} bytes, got {actual}")]
    FirstPartialTooShort { min: u64, actual: u64 },

    #[error("partial length exponent {0} out of range")]
    PartialExponent(u8),

    #[error("truncated packet")]
    Truncated,

    #[error("I/O error while framing: {0}")]
    Io(#[from] io::Error),
}

impl fmt::Display for PacketTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PacketTag::SessionKey                => "session-key",
            PacketTag::CompressedData            => "compressed-data",
            PacketTag::LiteralData               => "literal-data",
            PacketTag::EncryptedIntegrityData    => "encrypted-integrity-data",
            PacketTag::ModificationDetectionCode => "mdc",
        };
        f.write_str(name)
    }
}
