//! constants.rs
//! Wire constants for the supported OpenPGP subset (RFC 4880) and stream defaults.

/// Default chunk size for partial-length framing (bytes).
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;
/// Smallest partial chunk exponent: the first partial chunk of a packet must be >= 512 bytes.
pub const MIN_CHUNK_EXPONENT: u8 = 9;
/// Largest partial chunk exponent encodable in a single length byte.
pub const MAX_CHUNK_EXPONENT: u8 = 30;
/// Minimum length of the first partial chunk of any packet.
pub const MIN_FIRST_PARTIAL_LEN: u64 = 1 << MIN_CHUNK_EXPONENT;

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;
/// Random prefix length: one block plus the two duplicated check bytes.
pub const PREFIX_LEN: usize = BLOCK_SIZE + 2;

/// MDC packet header that precedes the digest inside the plaintext.
pub const MDC_MARKER: [u8; 2] = [0xD3, 0x14];
/// SHA-1 digest length carried by the MDC packet.
pub const MDC_DIGEST_LEN: usize = 20;
/// Plaintext bytes that are never released as payload.
pub const TRAILER_LEN: usize = MDC_MARKER.len() + MDC_DIGEST_LEN;
/// Extra room in the plaintext buffer beyond one chunk.
/// Must stay >= TRAILER_LEN; a full chunk is only decrypted while at most
/// TRAILER_LEN bytes are still unreleased.
pub const TRAILER_HEADROOM: usize = 88;

/// Packet tag registry (RFC 4880 §4.3).
pub mod tags {
    pub const SESSION_KEY: u8 = 3;
    pub const COMPRESSED_DATA: u8 = 8;
    pub const LITERAL_DATA: u8 = 11;
    pub const ENCRYPTED_INTEGRITY_DATA: u8 = 18;
    pub const MODIFICATION_DETECTION_CODE: u8 = 19;
}

/// Symmetric-Key Encrypted Session Key packet fields.
pub mod session_key {
    /// Packet body length.
    pub const BODY_LEN: u8 = 13;
    /// Packet length on the wire, header included.
    pub const PACKET_LEN: usize = 2 + BODY_LEN as usize;
    /// New format header byte.
    pub const TAG_NEW: u8 = 0xC3;
    /// Old format header byte (tag 3, one-byte length).
    pub const TAG_OLD: u8 = 0x8C;
    pub const VERSION: u8 = 4;
    /// Iterated and salted S2K.
    pub const S2K_ITERATED_SALTED: u8 = 3;
    pub const SALT_LEN: usize = 8;
    /// Coded count used when writing (1 015 808 bytes hashed).
    pub const DEFAULT_COUNT_BYTE: u8 = 0x9F;
    pub const MIN_ITERATION_COUNT: u32 = 1024;
    pub const MAX_ITERATION_COUNT: u32 = 65_011_712;
}

/// Symmetric algorithm identifiers (RFC 4880 §9.2).
pub mod cipher_ids {
    pub const AES256: u8 = 9;
}

/// Hash algorithm identifiers (RFC 4880 §9.4).
pub mod hash_ids {
    pub const SHA256: u8 = 8;
}

/// Integrity-protected data packet version.
pub const SEIPD_VERSION: u8 = 1;

/// Literal data format indicator for binary data.
pub const LITERAL_BINARY: u8 = b'b';

/// Default deflate/zlib level when writing (best compression).
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 9;
