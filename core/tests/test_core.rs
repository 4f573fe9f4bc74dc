// End to end: open_writer/open_reader and the one-shot helpers.

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};

    use proptest::prelude::*;
    use pgpsym_core::compression::codecs::PassThrough;
    use pgpsym_core::compression::{CodecRegistry, CompressionAlgorithm};
    use pgpsym_core::framing::{decode_new_length, PacketLength};
    use pgpsym_core::stream::{
        decrypt_stream, encrypt_stream, open_reader, open_writer, InputSource, OutputSink,
        PacketRead, PacketWrite, StreamConfig,
    };
    use pgpsym_core::types::{ErrorKind, StreamError};

    /// Fast S2K and small chunks so multi-chunk cases stay cheap.
    fn fast_config() -> StreamConfig {
        StreamConfig::default().with_s2k_count_byte(0).with_chunk_size(512)
    }

    fn encrypt_with(
        data: &[u8],
        password: &[u8],
        config: &StreamConfig,
        registry: &CodecRegistry,
    ) -> Result<Vec<u8>, StreamError> {
        let mut wire = Vec::new();
        {
            let mut w = open_writer(&mut wire, password, config, registry)?;
            w.write_all(data)?;
            w.finish()?;
        }
        Ok(wire)
    }

    fn encrypt(data: &[u8], password: &[u8], config: &StreamConfig) -> Vec<u8> {
        encrypt_with(data, password, config, &CodecRegistry::with_defaults()).unwrap()
    }

    fn decrypt_with(
        wire: &[u8],
        password: &[u8],
        config: &StreamConfig,
        registry: &CodecRegistry,
    ) -> Result<Vec<u8>, StreamError> {
        let mut r = open_reader(wire, password, config, registry)?;
        let mut out = Vec::new();
        r.read_to_end(&mut out)?;
        r.close()?;
        Ok(out)
    }

    fn decrypt(wire: &[u8], password: &[u8]) -> Result<Vec<u8>, StreamError> {
        decrypt_with(wire, password, &fast_config(), &CodecRegistry::with_defaults())
    }

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 31 % 251) as u8).collect()
    }

// # ✅ 1. Reference scenario

    #[test]
    fn hello_world_scenario() {
        let config = StreamConfig::default();
        let wire = encrypt(b"hello world", b"correct", &config);

        assert_eq!(&wire[..6], &[0xC3, 0x0D, 0x04, 0x09, 0x03, 0x08]);
        assert_eq!(wire[14], 0x9F);
        assert_eq!(wire[15], 0xD2);
        // Small message: one definite chunk, no partial lengths.
        let (len, used) = decode_new_length(&wire[16..]).unwrap();
        assert!(!len.is_partial());
        assert_eq!(len, PacketLength::Definite((wire.len() - 16 - used) as u64));

        assert_eq!(decrypt(&wire, b"correct").unwrap(), b"hello world");

        let err = open_reader(&wire[..], b"wrong", &config, &CodecRegistry::with_defaults())
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::WrongPassword);
    }

// # ✅ 2. Round trips across sizes and compression

    #[test]
    fn round_trip_sizes() {
        let config = fast_config();
        for len in [0usize, 1, 511, 512, 513, 4096, 20_000] {
            let data = pattern(len);
            let wire = encrypt(&data, b"pw", &config);
            assert_eq!(decrypt(&wire, b"pw").unwrap(), data, "len {}", len);
        }
    }

    #[test]
    fn round_trip_each_builtin_algorithm() {
        let data = pattern(10_000);
        for alg in [CompressionAlgorithm::Uncompressed, CompressionAlgorithm::Zip, CompressionAlgorithm::Zlib] {
            let config = fast_config().with_compression(alg);
            let wire = encrypt(&data, b"pw", &config);
            assert_eq!(decrypt(&wire, b"pw").unwrap(), data, "{}", alg.name());
        }
    }

    #[test]
    fn compression_shrinks_repetitive_input() {
        let data = vec![b'z'; 50_000];
        let plain = encrypt(&data, b"pw", &fast_config().with_compression(CompressionAlgorithm::Uncompressed));
        let packed = encrypt(&data, b"pw", &fast_config().with_compression(CompressionAlgorithm::Zlib));
        assert!(plain.len() > data.len());
        assert!(packed.len() < data.len() / 10);
    }

    #[test]
    fn reader_and_writer_chunk_sizes_are_independent() {
        let data = pattern(9_000);
        let wire = encrypt(&data, b"pw", &fast_config().with_chunk_size(2048));
        let out = decrypt_with(
            &wire,
            b"pw",
            &fast_config().with_chunk_size(512),
            &CodecRegistry::with_defaults(),
        )
        .unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn many_small_writes_and_reads() {
        let data = pattern(3_000);
        let mut wire = Vec::new();
        {
            let mut w = open_writer(&mut wire, b"pw", &fast_config(), &CodecRegistry::with_defaults()).unwrap();
            for piece in data.chunks(7) {
                w.write_all(piece).unwrap();
            }
            w.finish().unwrap();
        }

        let mut r = open_reader(&wire[..], b"pw", &fast_config(), &CodecRegistry::with_defaults()).unwrap();
        let mut out = Vec::new();
        let mut buf = [0u8; 13];
        loop {
            let n = r.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        r.close().unwrap();
        assert_eq!(out, data);
    }

// # ✅ 3. Literal metadata

    #[test]
    fn file_name_and_timestamp_preserved() {
        let config = fast_config().with_file_name("notes.txt").with_modified(1_700_000_000);
        let wire = encrypt(b"data", b"pw", &config);

        let mut r = open_reader(&wire[..], b"pw", &config, &CodecRegistry::with_defaults()).unwrap();
        assert_eq!(r.file_name(), "notes.txt");
        assert_eq!(r.modified(), 1_700_000_000);
        let mut out = Vec::new();
        r.read_to_end(&mut out).unwrap();
        r.close().unwrap();
        assert_eq!(out, b"data");
    }

    #[test]
    fn long_file_name_rejected() {
        let config = fast_config().with_file_name("n".repeat(256));
        let err = encrypt_with(b"x", b"pw", &config, &CodecRegistry::with_defaults()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);

        let ok = fast_config().with_file_name("n".repeat(255));
        let wire = encrypt(b"x", b"pw", &ok);
        assert_eq!(decrypt(&wire, b"pw").unwrap(), b"x");
    }

// # ✅ 4. Caller supplied codecs

    #[test]
    fn bzip2_without_codec_is_unsupported() {
        let config = fast_config().with_compression(CompressionAlgorithm::BZip2);
        let err = encrypt_with(b"x", b"pw", &config, &CodecRegistry::with_defaults()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedAlgorithm);
    }

    #[test]
    fn registered_codec_is_used_both_ways() {
        let mut registry = CodecRegistry::with_defaults();
        registry.register(CompressionAlgorithm::BZip2, PassThrough);
        assert!(registry.is_registered(CompressionAlgorithm::BZip2));

        let config = fast_config().with_compression(CompressionAlgorithm::BZip2);
        let data = pattern(2_000);
        let wire = encrypt_with(&data, b"pw", &config, &registry).unwrap();
        assert_eq!(decrypt_with(&wire, b"pw", &config, &registry).unwrap(), data);

        // Without the codec the reader cannot open the compressed layer.
        let err = decrypt(&wire, b"pw").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedAlgorithm);
    }

// # ✅ 5. Writer lifecycle

    #[test]
    fn finish_twice_and_write_after_finish_fail() {
        let mut wire = Vec::new();
        let mut w = open_writer(&mut wire, b"pw", &fast_config(), &CodecRegistry::with_defaults()).unwrap();
        w.write_all(b"abc").unwrap();
        w.finish().unwrap();
        assert!(matches!(w.finish(), Err(StreamError::Closed)));
        let err = StreamError::from(w.write(b"more").unwrap_err());
        assert!(matches!(err, StreamError::Closed));
    }

// # ✅ 6. One-shot helpers

    #[test]
    fn stream_helpers_in_memory() {
        let data = pattern(5_000);
        let enc = encrypt_stream(InputSource::Memory(data.clone()), OutputSink::Memory, b"pw", fast_config()).unwrap();
        let wire = enc.output.clone().unwrap();
        assert_eq!(enc.wire_bytes(), wire.len() as u64);
        assert!(enc.sanity_check());

        let dec = decrypt_stream(InputSource::Memory(wire), OutputSink::Memory, b"pw", fast_config()).unwrap();
        assert_eq!(dec.output.as_deref(), Some(&data[..]));
        assert!(dec.sanity_check());
    }

    #[test]
    fn stream_helpers_with_files() {
        let dir = std::env::temp_dir().join(format!("pgpsym-core-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let plain = dir.join("plain.bin");
        let sealed = dir.join("sealed.gpg");
        let opened = dir.join("opened.bin");

        let data = pattern(12_345);
        std::fs::write(&plain, &data).unwrap();
        encrypt_stream(InputSource::File(plain), OutputSink::File(sealed.clone()), b"pw", fast_config()).unwrap();
        decrypt_stream(InputSource::File(sealed), OutputSink::File(opened.clone()), b"pw", fast_config()).unwrap();
        assert_eq!(std::fs::read(&opened).unwrap(), data);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn stream_helper_reports_wrong_password() {
        let enc = encrypt_stream(InputSource::Memory(b"secret".to_vec()), OutputSink::Memory, b"a", fast_config()).unwrap();
        let err = decrypt_stream(InputSource::Memory(enc.output.unwrap()), OutputSink::Memory, b"b", fast_config())
            .unwrap_err();
        assert!(err.is_wrong_password());
    }

// # ✅ 7. Properties

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn round_trip_any_payload(
            data in proptest::collection::vec(any::<u8>(), 0..4096),
            write_exp in 9u8..=11,
            read_exp in 9u8..=11,
            alg in prop_oneof![
                Just(CompressionAlgorithm::Uncompressed),
                Just(CompressionAlgorithm::Zip),
                Just(CompressionAlgorithm::Zlib),
            ],
        ) {
            let wcfg = fast_config().with_chunk_size(1 << write_exp).with_compression(alg);
            let rcfg = fast_config().with_chunk_size(1 << read_exp);
            let wire = encrypt(&data, b"pw", &wcfg);
            let out = decrypt_with(&wire, b"pw", &rcfg, &CodecRegistry::with_defaults()).unwrap();
            prop_assert_eq!(out, data);
        }
    }
}
