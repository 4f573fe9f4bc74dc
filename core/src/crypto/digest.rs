use sha1::{Digest as _, Sha1};

use crate::constants::MDC_DIGEST_LEN;
use crate::crypto::types::CryptoError;
use crate::utils::ct_eq;

/// Running SHA-1 over `prefix ∥ plaintext ∥ D3 14`.
///
/// Produced exactly once: after `finalize_digest()` updates are ignored and
/// a second finalize fails.
pub struct MdcHasher {
    state: Option<Sha1>,
}

impl MdcHasher {
    #[inline]
    pub fn new() -> Self {
        Self { state: Some(Sha1::new()) }
    }

    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        if let Some(h) = self.state.as_mut() {
            h.update(data);
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.state.is_none()
    }

    pub fn finalize_digest(&mut self) -> Result<[u8; MDC_DIGEST_LEN], CryptoError> {
        let h = self.state.take().ok_or(CryptoError::Finalized)?;
        let mut out = [0u8; MDC_DIGEST_LEN];
        out.copy_from_slice(&h.finalize());
        Ok(out)
    }

    /// Finalize and compare against the digest carried by the stream.
    pub fn verify(&mut self, expected: &[u8]) -> Result<(), CryptoError> {
        let actual = self.finalize_digest()?;
        if ct_eq(&actual, expected) {
            Ok(())
        } else {
            Err(CryptoError::DigestMismatch)
        }
    }
}

impl Default for MdcHasher {
    fn default() -> Self {
        Self::new()
    }
}
