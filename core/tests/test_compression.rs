#[cfg(test)]
mod tests {
    use std::io::{self, Read, Write};

    use pgpsym_core::compression::{
        CodecRegistry, CompressionAlgorithm, CompressionError, Compressor, Decompressor,
    };
    use pgpsym_core::stream::{open_reader, open_writer, PacketRead, PacketWrite, StreamConfig};
    use pgpsym_core::types::{ErrorKind, StreamError};

    const MASK: u8 = 0x5A;

    /// Toy codec that masks every byte. Exercises the codec seam only.
    struct MaskCodec;

    struct MaskWriter<'a> {
        inner: Box<dyn PacketWrite + 'a>,
    }

    impl Write for MaskWriter<'_> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let masked: Vec<u8> = buf.iter().map(|b| b ^ MASK).collect();
            self.inner.write_all(&masked)?;
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.inner.flush()
        }
    }

    impl PacketWrite for MaskWriter<'_> {
        fn finish(&mut self) -> Result<(), StreamError> {
            self.inner.finish()
        }
    }

    struct MaskReader<'a> {
        inner: Box<dyn PacketRead + 'a>,
    }

    impl Read for MaskReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.inner.read(buf)?;
            buf[..n].iter_mut().for_each(|b| *b ^= MASK);
            Ok(n)
        }
    }

    impl PacketRead for MaskReader<'_> {
        fn peek(&mut self) -> Result<Option<u8>, StreamError> {
            Ok(self.inner.peek()?.map(|b| b ^ MASK))
        }

        fn close(&mut self) -> Result<(), StreamError> {
            self.inner.close()
        }
    }

    impl Compressor for MaskCodec {
        fn wrap_writer<'a>(
            &self,
            inner: Box<dyn PacketWrite + 'a>,
            _level: u32,
        ) -> Result<Box<dyn PacketWrite + 'a>, CompressionError> {
            Ok(Box::new(MaskWriter { inner }))
        }
    }

    impl Decompressor for MaskCodec {
        fn wrap_reader<'a>(
            &self,
            inner: Box<dyn PacketRead + 'a>,
        ) -> Result<Box<dyn PacketRead + 'a>, CompressionError> {
            Ok(Box::new(MaskReader { inner }))
        }
    }

    fn config(alg: CompressionAlgorithm) -> StreamConfig {
        StreamConfig::default().with_s2k_count_byte(0).with_compression(alg)
    }

    fn round_trip(
        data: &[u8],
        cfg: &StreamConfig,
        write_registry: &CodecRegistry,
        read_registry: &CodecRegistry,
    ) -> Result<Vec<u8>, StreamError> {
        let mut wire = Vec::new();
        {
            let mut w = open_writer(&mut wire, b"pw", cfg, write_registry)?;
            w.write_all(data)?;
            w.finish()?;
        }
        let mut r = open_reader(&wire[..], b"pw", cfg, read_registry)?;
        let mut out = Vec::new();
        r.read_to_end(&mut out)?;
        r.close()?;
        Ok(out)
    }

// # ✅ 1. Registry contents

    #[test]
    fn defaults_cover_builtin_algorithms() {
        let r = CodecRegistry::default();
        assert!(r.is_registered(CompressionAlgorithm::Uncompressed));
        assert!(r.is_registered(CompressionAlgorithm::Zip));
        assert!(r.is_registered(CompressionAlgorithm::Zlib));
        assert!(!r.is_registered(CompressionAlgorithm::BZip2));
        assert!(!CodecRegistry::empty().is_registered(CompressionAlgorithm::Zlib));
    }

    #[test]
    fn resolve_raw_errors() {
        let r = CodecRegistry::with_defaults();
        assert!(r.resolve_raw(2).is_ok());
        assert!(matches!(r.resolve_raw(3), Err(CompressionError::UnsupportedAlgorithm { raw: 3 })));
        assert!(matches!(r.resolve_raw(200), Err(CompressionError::UnknownAlgorithm { raw: 200 })));

        let unsupported = StreamError::from(CompressionError::UnsupportedAlgorithm { raw: 3 });
        assert_eq!(unsupported.kind(), ErrorKind::UnsupportedAlgorithm);
        let unknown = StreamError::from(CompressionError::UnknownAlgorithm { raw: 200 });
        assert_eq!(unknown.kind(), ErrorKind::Format);
    }

    #[test]
    fn error_messages_name_the_algorithm() {
        assert_eq!(
            CompressionError::UnsupportedAlgorithm { raw: 3 }.to_string(),
            "unsupported compression algorithm: BZip2"
        );
        assert_eq!(
            CompressionError::InvalidLevel { codec: "zlib", level: 12 }.to_string(),
            "invalid compression level 12 for zlib"
        );
    }

// # ✅ 2. Levels

    #[test]
    fn every_level_round_trips() {
        let data = b"level test level test level test".repeat(20);
        let registry = CodecRegistry::with_defaults();
        for level in 0..=9 {
            let mut cfg = config(CompressionAlgorithm::Zlib);
            cfg.compression_level = level;
            assert_eq!(round_trip(&data, &cfg, &registry, &registry).unwrap(), data, "level {}", level);
        }
    }

    #[test]
    fn out_of_range_level_rejected() {
        let mut cfg = config(CompressionAlgorithm::Zip);
        cfg.compression_level = 10;
        let registry = CodecRegistry::with_defaults();
        let err = round_trip(b"x", &cfg, &registry, &registry).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

// # ✅ 3. Caller supplied codecs

    #[test]
    fn custom_codec_for_bzip2_slot() {
        let mut registry = CodecRegistry::with_defaults();
        registry.register(CompressionAlgorithm::BZip2, MaskCodec);
        let data = b"masked, not compressed".to_vec();
        let cfg = config(CompressionAlgorithm::BZip2);
        assert_eq!(round_trip(&data, &cfg, &registry, &registry).unwrap(), data);

        let err = round_trip(&data, &cfg, &registry, &CodecRegistry::with_defaults()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedAlgorithm);
    }

    #[test]
    fn replacing_a_builtin_codec() {
        let mut masked = CodecRegistry::with_defaults();
        masked.register(CompressionAlgorithm::Zlib, MaskCodec);
        let data = vec![0xC3u8; 300];
        let cfg = config(CompressionAlgorithm::Zlib);
        assert_eq!(round_trip(&data, &cfg, &masked, &masked).unwrap(), data);

        // Masked bytes are not a zlib stream.
        let err = round_trip(&data, &cfg, &masked, &CodecRegistry::with_defaults()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
