//! Packet header encoding.
//!
//! Always emits the shortest definite length encoding; partial lengths are
//! only produced on explicit request by the streaming writers.

use crate::constants::{MAX_CHUNK_EXPONENT, MIN_CHUNK_EXPONENT};
use crate::framing::types::{FrameError, PacketTag};

/// New format tag byte: `0xC0 | tag`.
#[inline]
pub const fn encode_tag(tag: PacketTag) -> u8 {
    0xC0 | tag as u8
}

/// Old format tag byte: `0x80 | tag << 2 | length_type`.
pub fn encode_old_tag(tag: PacketTag, length_type: u8) -> Result<u8, FrameError> {
    if !tag.fits_old_format() {
        return Err(FrameError::InvalidTagByte(tag as u8));
    }
    if length_type > 3 {
        return Err(FrameError::InvalidLengthType(length_type));
    }
    Ok(0x80 | ((tag as u8) << 2) | length_type)
}

/// Shortest new format definite length encoding for `len`.
///
/// ```text
/// 0..=191       [len]
/// 192..=8383    [((len - 192) >> 8) + 192][(len - 192) & 0xFF]
/// 8384..        [0xFF][len: u32 BE]
/// ```
pub fn encode_length(len: u32) -> Vec<u8> {
    if len < 192 {
        vec![len as u8]
    } else if len <= 8383 {
        let v = len - 192;
        vec![((v >> 8) as u8) + 192, (v & 0xFF) as u8]
    } else {
        let mut out = Vec::with_capacity(5);
        out.push(0xFF);
        out.extend_from_slice(&len.to_be_bytes());
        out
    }
}

/// Partial length byte for a chunk of `2^power` bytes.
///
/// Writers never go below 2^9 so that the first chunk satisfies the 512 byte minimum.
pub fn encode_partial(power: u8) -> Result<u8, FrameError> {
    if !(MIN_CHUNK_EXPONENT..=MAX_CHUNK_EXPONENT).contains(&power) {
        return Err(FrameError::PartialExponent(power));
    }
    Ok(224 + power)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_boundaries_use_shortest_form() {
        assert_eq!(encode_length(0), vec![0]);
        assert_eq!(encode_length(191), vec![191]);
        assert_eq!(encode_length(192), vec![192, 0]);
        assert_eq!(encode_length(8383), vec![223, 255]);
        assert_eq!(encode_length(8384), vec![0xFF, 0, 0, 0x20, 0xC0]);
        assert_eq!(encode_length(u32::MAX), vec![0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn tag_bytes_match_wire_constants() {
        assert_eq!(encode_tag(PacketTag::SessionKey), 0xC3);
        assert_eq!(encode_tag(PacketTag::EncryptedIntegrityData), 0xD2);
        assert_eq!(encode_tag(PacketTag::CompressedData), 0xC8);
        assert_eq!(encode_tag(PacketTag::LiteralData), 0xCB);
        assert_eq!(encode_tag(PacketTag::ModificationDetectionCode), 0xD3);
        assert_eq!(encode_old_tag(PacketTag::SessionKey, 0).unwrap(), 0x8C);
        assert!(encode_old_tag(PacketTag::EncryptedIntegrityData, 0).is_err());
    }

    #[test]
    fn partial_byte_range() {
        assert_eq!(encode_partial(13).unwrap(), 237);
        assert!(encode_partial(8).is_err());
        assert!(encode_partial(31).is_err());
    }
}
