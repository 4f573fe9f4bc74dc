#[cfg(test)]
mod tests {
    use pgpsym_core::headers::{
        decode_session_key, encode_session_key, HashAlgorithm, HeaderError, SessionKeyPacket,
        SymmetricAlgorithm,
    };
    use pgpsym_core::types::{ErrorKind, StreamError};

    fn sample() -> SessionKeyPacket {
        SessionKeyPacket::new([1, 2, 3, 4, 5, 6, 7, 8], 0x9F)
    }

// # ✅ 1. Exact wire layout

    #[test]
    fn encodes_fixed_layout() {
        let wire = encode_session_key(&sample());
        assert_eq!(
            wire,
            [0xC3, 0x0D, 0x04, 0x09, 0x03, 0x08, 1, 2, 3, 4, 5, 6, 7, 8, 0x9F]
        );
        assert_eq!(wire.len(), SessionKeyPacket::LEN);
    }

    #[test]
    fn decodes_what_was_encoded() {
        let p = sample();
        let decoded = decode_session_key(&encode_session_key(&p)).unwrap();
        assert_eq!(decoded, p);
        assert_eq!(decoded.cipher, SymmetricAlgorithm::Aes256);
        assert_eq!(decoded.hash, HashAlgorithm::Sha256);
        assert_eq!(decoded.iteration_count(), 1_015_808);
    }

    #[test]
    fn accepts_old_format_header() {
        let mut wire = encode_session_key(&sample());
        wire[0] = 0x8C;
        assert_eq!(decode_session_key(&wire).unwrap(), sample());
    }

// # ✅ 2. Structural errors

    #[test]
    fn rejects_short_buffer() {
        let wire = encode_session_key(&sample());
        assert!(matches!(
            decode_session_key(&wire[..14]),
            Err(HeaderError::BufferTooShort { have: 14, need: 15 })
        ));
    }

    #[test]
    fn rejects_bad_structure() {
        let cases: &[(usize, u8)] = &[(0, 0xC2), (1, 12), (2, 5), (4, 1)];
        for &(pos, val) in cases {
            let mut wire = encode_session_key(&sample());
            wire[pos] = val;
            let err = decode_session_key(&wire).unwrap_err();
            match (pos, &err) {
                (0, HeaderError::InvalidTag { have: 0xC2 })
                | (1, HeaderError::InvalidLength { have: 12 })
                | (2, HeaderError::InvalidVersion { have: 5 })
                | (4, HeaderError::UnsupportedS2k { raw: 1 }) => {}
                _ => panic!("byte {} = {}: unexpected {:?}", pos, val, err),
            }
            assert_eq!(StreamError::from(err).kind(), ErrorKind::Format);
        }
    }

    #[test]
    fn structure_checked_before_algorithms() {
        let mut wire = encode_session_key(&sample());
        wire[2] = 3;
        wire[3] = 7;
        assert!(matches!(decode_session_key(&wire), Err(HeaderError::InvalidVersion { have: 3 })));
    }

// # ✅ 3. Unsupported algorithms are distinguished

    #[test]
    fn unsupported_cipher_and_hash() {
        let mut wire = encode_session_key(&sample());
        wire[3] = 7; // AES-128
        let err = decode_session_key(&wire).unwrap_err();
        assert!(matches!(err, HeaderError::UnsupportedCipher { raw: 7 }));
        assert_eq!(StreamError::from(err).kind(), ErrorKind::UnsupportedAlgorithm);

        let mut wire = encode_session_key(&sample());
        wire[5] = 2; // SHA-1
        let err = decode_session_key(&wire).unwrap_err();
        assert!(matches!(err, HeaderError::UnsupportedHash { raw: 2 }));
        assert_eq!(StreamError::from(err).kind(), ErrorKind::UnsupportedAlgorithm);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            HeaderError::UnsupportedCipher { raw: 9 }.to_string(),
            "unsupported cipher: Aes256"
        );
        assert_eq!(
            HeaderError::UnsupportedCipher { raw: 7 }.to_string(),
            "unsupported cipher: 0x7"
        );
        assert_eq!(
            HeaderError::InvalidLength { have: 12 }.to_string(),
            "invalid session key packet length: 12"
        );
    }
}
