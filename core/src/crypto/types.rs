// ## 📂 File: `src/crypto/types.rs`

use std::fmt;

use crate::constants::session_key::{MAX_ITERATION_COUNT, MIN_ITERATION_COUNT};

/// AES-256 key length.
pub const KEY_LEN_32: usize = 32;

/// Derived message key. Wiped when dropped.
pub type MessageKey = zeroize::Zeroizing<[u8; KEY_LEN_32]>;

#[derive(Debug)]
pub enum CryptoError {
    /// S2K iteration count outside the range a count byte can encode.
    InvalidIterationCount { count: u32 },

    /// Invalid key length provided to cipher.
    InvalidKeyLen { expected: usize, actual: usize },

    /// Cipher or digest used after `finalize()`.
    Finalized,

    /// MDC digest does not match the recomputed value.
    DigestMismatch,

    /// General runtime error with context.
    Failure(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CryptoError::*;
        match self {
            InvalidIterationCount { count } =>
                write!(f, "invalid S2K iteration count {} (allowed {}..={})",
                       count, MIN_ITERATION_COUNT, MAX_ITERATION_COUNT),
            InvalidKeyLen { expected, actual } =>
                write!(f, "invalid key length: expected={}, actual={}", expected, actual),
            Finalized =>
                write!(f, "operation after finalize"),
            DigestMismatch =>
                write!(f, "modification detection code mismatch"),
            Failure(msg) =>
                write!(f, "crypto failure: {}", msg),
        }
    }
}

impl std::error::Error for CryptoError {}
