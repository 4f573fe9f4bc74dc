//! crypto/cfb.rs
//! AES-256 in CFB-128 with a zero IV, as used by integrity protected data
//! packets (no OpenPGP resync step for tag 18).
//!
//! Byte granular: callers may pass any slice length, the position inside the
//! current block is carried across calls.

use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes256Enc, Block};
use rand::RngCore;
use zeroize::Zeroize;

use crate::constants::{BLOCK_SIZE, PREFIX_LEN};
use crate::crypto::types::{CryptoError, KEY_LEN_32};

pub struct CfbCipher {
    /// Round keys; taken (and wiped on drop) by `finalize()`.
    cipher: Option<Aes256Enc>,
    /// Keystream block, overwritten byte by byte with ciphertext.
    register: [u8; BLOCK_SIZE],
    /// Next byte position in `register`; `BLOCK_SIZE` means a new block is due.
    offset: usize,
}

impl CfbCipher {
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let cipher = Aes256Enc::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLen {
            expected: KEY_LEN_32,
            actual: key.len(),
        })?;
        Ok(Self {
            cipher: Some(cipher),
            register: [0u8; BLOCK_SIZE],
            offset: BLOCK_SIZE,
        })
    }

    /// Encrypt `buf` in place.
    pub fn encrypt(&mut self, buf: &mut [u8]) -> Result<(), CryptoError> {
        let cipher = self.cipher.as_ref().ok_or(CryptoError::Finalized)?;
        for b in buf.iter_mut() {
            if self.offset == BLOCK_SIZE {
                cipher.encrypt_block(Block::from_mut_slice(&mut self.register));
                self.offset = 0;
            }
            *b ^= self.register[self.offset];
            self.register[self.offset] = *b;
            self.offset += 1;
        }
        Ok(())
    }

    /// Decrypt `buf` in place.
    pub fn decrypt(&mut self, buf: &mut [u8]) -> Result<(), CryptoError> {
        let cipher = self.cipher.as_ref().ok_or(CryptoError::Finalized)?;
        for b in buf.iter_mut() {
            if self.offset == BLOCK_SIZE {
                cipher.encrypt_block(Block::from_mut_slice(&mut self.register));
                self.offset = 0;
            }
            let c = *b;
            *b ^= self.register[self.offset];
            self.register[self.offset] = c;
            self.offset += 1;
        }
        Ok(())
    }

    /// Close the frame. The key schedule is dropped and the feedback
    /// register wiped; later calls fail.
    pub fn finalize(&mut self) {
        self.cipher = None;
        self.register.zeroize();
        self.offset = BLOCK_SIZE;
    }

    pub fn is_finalized(&self) -> bool {
        self.cipher.is_none()
    }
}

impl Drop for CfbCipher {
    fn drop(&mut self) {
        self.register.zeroize();
    }
}

/// Random resync prefix: one block of random bytes with its last two bytes repeated.
pub fn random_prefix() -> [u8; PREFIX_LEN] {
    let mut prefix = [0u8; PREFIX_LEN];
    rand::rngs::OsRng.fill_bytes(&mut prefix[..BLOCK_SIZE]);
    prefix[BLOCK_SIZE] = prefix[BLOCK_SIZE - 2];
    prefix[BLOCK_SIZE + 1] = prefix[BLOCK_SIZE - 1];
    prefix
}

/// Quick key check on a decrypted prefix.
#[inline]
pub fn check_prefix(prefix: &[u8; PREFIX_LEN]) -> bool {
    prefix[BLOCK_SIZE - 2] == prefix[BLOCK_SIZE] && prefix[BLOCK_SIZE - 1] == prefix[BLOCK_SIZE + 1]
}
