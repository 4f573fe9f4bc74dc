//! Packet header decoding.
//!
//! Slice based helpers (`decode_*`) for in-memory inspection and `Read`
//! based helpers (`read_*`) for the streaming readers. Both share the same
//! length rules; a short input is always `FrameError::Truncated`.

use std::io::{self, Read};
use byteorder::{BigEndian, ByteOrder, ReadBytesExt};

use crate::framing::types::{FrameError, HeaderFormat, PacketHeader, PacketLength, PacketTag};

#[inline]
fn eof_to_truncated(e: io::Error) -> FrameError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        FrameError::Truncated
    } else {
        FrameError::Io(e)
    }
}

/// Split a tag byte into its raw tag number and header format.
pub fn decode_tag_byte(byte: u8) -> Result<(u8, HeaderFormat), FrameError> {
    if byte & 0x80 == 0 {
        return Err(FrameError::InvalidTagByte(byte));
    }
    if byte & 0x40 != 0 {
        Ok((byte & 0x3F, HeaderFormat::New))
    } else {
        Ok(((byte & 0x3C) >> 2, HeaderFormat::Old { length_type: byte & 0x03 }))
    }
}

/// True when `byte` is a header byte (either format) for `tag`.
pub fn is_packet_tag(byte: u8, tag: PacketTag) -> bool {
    matches!(decode_tag_byte(byte), Ok((raw, _)) if raw == tag as u8)
}

/// Bytes occupied by a new format length whose first byte is `first`.
pub fn new_length_space(first: u8) -> usize {
    match first {
        0..=191 => 1,
        192..=223 => 2,
        224..=254 => 1,
        255 => 5,
    }
}

/// Decode a new format length from the start of `buf`.
///
/// Returns the length and the number of bytes it occupied.
pub fn decode_new_length(buf: &[u8]) -> Result<(PacketLength, usize), FrameError> {
    let first = *buf.first().ok_or(FrameError::Truncated)?;
    match first {
        0..=191 => Ok((PacketLength::Definite(first as u64), 1)),
        192..=223 => {
            let second = *buf.get(1).ok_or(FrameError::Truncated)?;
            let len = ((first as u64 - 192) << 8) + second as u64 + 192;
            Ok((PacketLength::Definite(len), 2))
        }
        224..=254 => Ok((PacketLength::Partial(first & 0x1F), 1)),
        255 => {
            if buf.len() < 5 {
                return Err(FrameError::Truncated);
            }
            Ok((PacketLength::Definite(BigEndian::read_u32(&buf[1..5]) as u64), 5))
        }
    }
}

/// Decode an old format length of the given type from the start of `buf`.
pub fn decode_old_length(length_type: u8, buf: &[u8]) -> Result<(PacketLength, usize), FrameError> {
    let need = match length_type {
        0 => 1,
        1 => 2,
        2 => 4,
        3 => return Ok((PacketLength::Indeterminate, 0)),
        other => return Err(FrameError::InvalidLengthType(other)),
    };
    if buf.len() < need {
        return Err(FrameError::Truncated);
    }
    let len = match need {
        1 => buf[0] as u64,
        2 => BigEndian::read_u16(&buf[..2]) as u64,
        _ => BigEndian::read_u32(&buf[..4]) as u64,
    };
    Ok((PacketLength::Definite(len), need))
}

/// Read a new format length. Partial chunk continuations always use this form.
pub fn read_new_length<R: Read + ?Sized>(r: &mut R) -> Result<PacketLength, FrameError> {
    let first = r.read_u8().map_err(eof_to_truncated)?;
    match first {
        0..=191 => Ok(PacketLength::Definite(first as u64)),
        192..=223 => {
            let second = r.read_u8().map_err(eof_to_truncated)?;
            Ok(PacketLength::Definite(((first as u64 - 192) << 8) + second as u64 + 192))
        }
        224..=254 => Ok(PacketLength::Partial(first & 0x1F)),
        255 => Ok(PacketLength::Definite(
            r.read_u32::<BigEndian>().map_err(eof_to_truncated)? as u64,
        )),
    }
}

pub fn read_old_length<R: Read + ?Sized>(r: &mut R, length_type: u8) -> Result<PacketLength, FrameError> {
    let len = match length_type {
        0 => r.read_u8().map_err(eof_to_truncated)? as u64,
        1 => r.read_u16::<BigEndian>().map_err(eof_to_truncated)? as u64,
        2 => r.read_u32::<BigEndian>().map_err(eof_to_truncated)? as u64,
        3 => return Ok(PacketLength::Indeterminate),
        other => return Err(FrameError::InvalidLengthType(other)),
    };
    Ok(PacketLength::Definite(len))
}

/// Read the length field that follows a tag byte of the given format.
pub fn read_length<R: Read + ?Sized>(r: &mut R, format: HeaderFormat) -> Result<PacketLength, FrameError> {
    match format {
        HeaderFormat::New => read_new_length(r),
        HeaderFormat::Old { length_type } => read_old_length(r, length_type),
    }
}

/// Read a full packet header and check it announces `expected`.
pub fn read_header<R: Read + ?Sized>(r: &mut R, expected: PacketTag) -> Result<PacketHeader, FrameError> {
    let byte = r.read_u8().map_err(eof_to_truncated)?;
    read_header_after_tag(r, byte, expected)
}

/// Same as [`read_header`] when the tag byte has already been consumed.
pub fn read_header_after_tag<R: Read + ?Sized>(
    r: &mut R,
    byte: u8,
    expected: PacketTag,
) -> Result<PacketHeader, FrameError> {
    let (raw, format) = decode_tag_byte(byte)?;
    if raw != expected as u8 {
        return Err(FrameError::UnexpectedTag { expected, actual: byte });
    }
    let length = read_length(r, format)?;
    Ok(PacketHeader { tag: expected, format, length })
}
