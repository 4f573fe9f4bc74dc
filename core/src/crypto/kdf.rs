// ## src/crypto/kdf.rs

//! crypto/kdf.rs
//! Iterated and salted S2K (RFC 4880 §3.7.1.3) with SHA-256.
//!
//! The hash input is `salt ∥ password` repeated and cut off so that exactly
//! `count` bytes are hashed. SHA-256 yields the 32 byte AES-256 key in a
//! single context, so no preloaded contexts are needed.

use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::constants::session_key::{MAX_ITERATION_COUNT, MIN_ITERATION_COUNT, SALT_LEN};
use crate::crypto::types::{CryptoError, MessageKey, KEY_LEN_32};

/// Expand a coded count byte into the number of bytes to hash.
#[inline]
pub fn decode_count(c: u8) -> u32 {
    (16 + (c as u32 & 15)) << ((c as u32 >> 4) + 6)
}

/// Fresh random salt for a new message.
pub fn random_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive the 32 byte message key.
///
/// Errors:
/// - `count` outside `[1024, 65_011_712]` returns `CryptoError::InvalidIterationCount`.
pub fn derive_key(
    password: &[u8],
    salt: &[u8; SALT_LEN],
    count: u32,
) -> Result<MessageKey, CryptoError> {
    if !(MIN_ITERATION_COUNT..=MAX_ITERATION_COUNT).contains(&count) {
        return Err(CryptoError::InvalidIterationCount { count });
    }

    let segment = (SALT_LEN + password.len()) as u64;
    let mut remaining = count as u64;
    let mut hasher = Sha256::new();

    while remaining > segment {
        hasher.update(salt);
        hasher.update(password);
        remaining -= segment;
    }
    // remaining <= segment here, so the slice bounds hold
    let rem = remaining as usize;
    if rem < SALT_LEN {
        hasher.update(&salt[..rem]);
    } else {
        hasher.update(salt);
        hasher.update(&password[..rem - SALT_LEN]);
    }

    let mut key = Zeroizing::new([0u8; KEY_LEN_32]);
    key.copy_from_slice(&hasher.finalize());
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_byte_decoding() {
        assert_eq!(decode_count(0x00), 1024);
        assert_eq!(decode_count(0x60), 65_536);
        assert_eq!(decode_count(0x9F), 1_015_808);
        assert_eq!(decode_count(0xFF), 65_011_712);
    }

    #[test]
    fn hashes_exactly_count_bytes() {
        let salt = *b"saltsalt";
        let password = b"pw";
        let count = 1030u32;

        let mut stream = Vec::new();
        while stream.len() < count as usize {
            stream.extend_from_slice(&salt);
            stream.extend_from_slice(password);
        }
        stream.truncate(count as usize);
        let expected = Sha256::digest(&stream);

        let key = derive_key(password, &salt, count).unwrap();
        assert_eq!(&key[..], &expected[..]);
    }

    #[test]
    fn rejects_out_of_range_count() {
        let salt = [0u8; SALT_LEN];
        assert!(matches!(
            derive_key(b"x", &salt, 1023),
            Err(CryptoError::InvalidIterationCount { count: 1023 })
        ));
    }
}
