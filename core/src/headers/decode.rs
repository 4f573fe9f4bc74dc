//! headers/decode.rs
//!
//! Session key packet parsing.
//!
//! Structural fields (tag, length, version, S2K type) are checked before the
//! algorithm identifiers, so a malformed packet reports a format problem even
//! when it also names an unknown algorithm.

use crate::constants::session_key;
use crate::headers::types::{HashAlgorithm, HeaderError, SessionKeyPacket, SymmetricAlgorithm};

pub fn decode_session_key(buf: &[u8]) -> Result<SessionKeyPacket, HeaderError> {
    if buf.len() < SessionKeyPacket::LEN {
        return Err(HeaderError::BufferTooShort { have: buf.len(), need: SessionKeyPacket::LEN });
    }

    if buf[0] != session_key::TAG_NEW && buf[0] != session_key::TAG_OLD {
        return Err(HeaderError::InvalidTag { have: buf[0] });
    }
    if buf[1] != session_key::BODY_LEN {
        return Err(HeaderError::InvalidLength { have: buf[1] });
    }
    if buf[2] != session_key::VERSION {
        return Err(HeaderError::InvalidVersion { have: buf[2] });
    }
    if buf[4] != session_key::S2K_ITERATED_SALTED {
        return Err(HeaderError::UnsupportedS2k { raw: buf[4] });
    }

    let cipher = SymmetricAlgorithm::try_from(buf[3])
        .map_err(|_| HeaderError::UnsupportedCipher { raw: buf[3] })?;
    let hash = HashAlgorithm::try_from(buf[5])
        .map_err(|_| HeaderError::UnsupportedHash { raw: buf[5] })?;

    let mut salt = [0u8; session_key::SALT_LEN];
    salt.copy_from_slice(&buf[6..14]);

    Ok(SessionKeyPacket { cipher, hash, salt, count_byte: buf[14] })
}
