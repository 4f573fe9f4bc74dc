//! headers/types.rs
//! Session key packet model and its error type.

use std::fmt;
use num_enum::TryFromPrimitive;

use crate::constants::{cipher_ids, hash_ids, session_key};
use crate::crypto::kdf::decode_count;
use crate::utils::{enum_name_or_hex, fmt_bytes};

/// Symmetric algorithms this crate can decrypt (RFC 4880 §9.2).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum SymmetricAlgorithm {
    Aes256 = cipher_ids::AES256,
}

/// S2K hash algorithms this crate can use (RFC 4880 §9.4).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum HashAlgorithm {
    Sha256 = hash_ids::SHA256,
}

/// Decoded session key packet.
///
/// Wire layout (15 bytes):
/// ```text
/// [0]     0xC3 (or old format 0x8C)
/// [1]     13   body length
/// [2]     4    version
/// [3]     9    AES-256
/// [4]     3    iterated+salted S2K
/// [5]     8    SHA-256
/// [6..14] salt
/// [14]    coded iteration count
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionKeyPacket {
    pub cipher: SymmetricAlgorithm,
    pub hash: HashAlgorithm,
    pub salt: [u8; session_key::SALT_LEN],
    pub count_byte: u8,
}

impl SessionKeyPacket {
    pub const LEN: usize = session_key::PACKET_LEN;

    pub fn new(salt: [u8; session_key::SALT_LEN], count_byte: u8) -> Self {
        Self {
            cipher: SymmetricAlgorithm::Aes256,
            hash: HashAlgorithm::Sha256,
            salt,
            count_byte,
        }
    }

    /// Number of bytes fed to the S2K hash.
    pub fn iteration_count(&self) -> u32 {
        decode_count(self.count_byte)
    }
}

#[derive(Debug)]
pub enum HeaderError {
    /// Fewer than 15 bytes available.
    BufferTooShort { have: usize, need: usize },

    /// First byte is neither 0xC3 nor 0x8C.
    InvalidTag { have: u8 },

    /// Body length byte is not 13.
    InvalidLength { have: u8 },

    /// Packet version is not 4.
    InvalidVersion { have: u8 },

    /// S2K specifier is not iterated+salted.
    UnsupportedS2k { raw: u8 },

    /// Cipher other than AES-256.
    UnsupportedCipher { raw: u8 },

    /// S2K hash other than SHA-256.
    UnsupportedHash { raw: u8 },
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use HeaderError::*;
        match self {
            BufferTooShort { have, need } =>
                write!(f, "session key packet too short: {} < {}", have, need),
            InvalidTag { have } =>
                write!(f, "not a session key packet: {}", fmt_bytes(&[*have])),
            InvalidLength { have } =>
                write!(f, "invalid session key packet length: {}", have),
            InvalidVersion { have } =>
                write!(f, "unsupported session key packet version: {}", have),
            UnsupportedS2k { raw } =>
                write!(f, "unsupported S2K specifier: {}", raw),
            UnsupportedCipher { raw } =>
                write!(f, "unsupported cipher: {}",
                    enum_name_or_hex::<SymmetricAlgorithm>(*raw)),
            UnsupportedHash { raw } =>
                write!(f, "unsupported S2K hash: {}",
                    enum_name_or_hex::<HashAlgorithm>(*raw)),
        }
    }
}

impl std::error::Error for HeaderError {}
