//! headers/encode.rs
//! Session key packet serialization. Always new format (`0xC3`).

use crate::constants::session_key;
use crate::headers::types::SessionKeyPacket;

pub fn encode_session_key(p: &SessionKeyPacket) -> [u8; SessionKeyPacket::LEN] {
    let mut out = [0u8; SessionKeyPacket::LEN];
    out[0] = session_key::TAG_NEW;
    out[1] = session_key::BODY_LEN;
    out[2] = session_key::VERSION;
    out[3] = p.cipher as u8;
    out[4] = session_key::S2K_ITERATED_SALTED;
    out[5] = p.hash as u8;
    out[6..14].copy_from_slice(&p.salt);
    out[14] = p.count_byte;
    out
}
