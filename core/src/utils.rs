//! utils.rs
//! Small helpers shared by the framing, crypto and error layers.

use std::fmt;
use num_enum::TryFromPrimitive;

use crate::constants::{MAX_CHUNK_EXPONENT, MIN_CHUNK_EXPONENT};

/// Round a requested chunk size up to a power of two and return its exponent.
///
/// - `0` or anything below 512 maps to 2^9 (the protocol minimum for a first partial chunk).
/// - Anything above 2^30 is clamped to 2^30 (largest partial length a single byte encodes).
pub fn chunk_exponent(requested: usize) -> u8 {
    let mut exponent = MIN_CHUNK_EXPONENT;
    while exponent < MAX_CHUNK_EXPONENT && (1usize << exponent) < requested {
        exponent += 1;
    }
    exponent
}

/// Chunk size in bytes for a given exponent.
#[inline]
pub fn chunk_size_for(exponent: u8) -> usize {
    1usize << exponent
}

pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

pub fn fmt_bytes(b: &[u8]) -> String {
    if b.iter().all(|&c| c.is_ascii_graphic() || c == b' ') {
        format!("b\"{}\"", String::from_utf8_lossy(b))
    } else {
        format!("0x{}", hex::encode(b))
    }
}

/// Constant-time equality for secret-dependent comparisons.
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
