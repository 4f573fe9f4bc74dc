#[cfg(test)]
mod tests {
    use std::io::{Read, Write};

    use pgpsym_core::compression::{CodecRegistry, CompressionAlgorithm};
    use pgpsym_core::stream::{open_reader, open_writer, PacketRead, PacketWrite, StreamConfig};
    use tracing_subscriber::EnvFilter;

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("pgpsym_core=trace"))
            .with_test_writer()
            .try_init();
    }

    // Every log statement on the write, read and failure paths must render.
    #[test]
    fn traced_round_trip_and_failure() {
        init_logging();
        // Uncompressed and several chunks, so tampering surfaces after open.
        let cfg = StreamConfig::default()
            .with_s2k_count_byte(0)
            .with_chunk_size(512)
            .with_compression(CompressionAlgorithm::Uncompressed);
        let registry = CodecRegistry::with_defaults();

        let mut wire = Vec::new();
        {
            let mut w = open_writer(&mut wire, b"pw", &cfg, &registry).unwrap();
            w.write_all(&[0x10; 2048]).unwrap();
            w.finish().unwrap();
        }

        {
            let mut r = open_reader(&wire[..], b"pw", &cfg, &registry).unwrap();
            let mut out = Vec::new();
            r.read_to_end(&mut out).unwrap();
            r.close().unwrap();
            assert_eq!(out, vec![0x10; 2048]);
        }

        let last = wire.len() - 1;
        wire[last] ^= 1;
        let mut r = open_reader(&wire[..], b"pw", &cfg, &registry).unwrap();
        let mut sink = Vec::new();
        assert!(r.read_to_end(&mut sink).is_err());
        assert!(r.close().is_err());
    }
}
