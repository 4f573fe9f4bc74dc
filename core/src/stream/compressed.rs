//! stream/compressed.rs
//! Compressed data packet (tag 8): one algorithm byte, then codec output.

use std::io::{self, Write};
use byteorder::ReadBytesExt;

use crate::compression::{CodecRegistry, CompressionAlgorithm};
use crate::framing::PacketTag;
use crate::stream::packet::{PacketBodyReader, PacketBodyWriter, PacketRead, PacketWrite};
use crate::types::StreamError;
use crate::utils::enum_name_or_hex;

/// Open a compressed packet and return its decompressed content.
pub fn open_compressed<'a>(
    inner: Box<dyn PacketRead + 'a>,
    registry: &CodecRegistry,
) -> Result<Box<dyn PacketRead + 'a>, StreamError> {
    let mut body = PacketBodyReader::open(inner, PacketTag::CompressedData)?;
    let raw = body.read_u8().map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => StreamError::Format("truncated compressed data header".into()),
        _ => StreamError::from(e),
    })?;
    let codec = match registry.resolve_raw(raw) {
        Ok(codec) => codec,
        Err(e) => {
            // The id is unauthenticated until the MDC checks out.
            tracing::debug!(raw, "no codec for compressed data, verifying before reporting");
            io::copy(&mut body, &mut io::sink())?;
            body.close()?;
            return Err(e.into());
        }
    };
    tracing::debug!(algorithm = %enum_name_or_hex::<CompressionAlgorithm>(raw), "compressed data packet");
    Ok(codec.wrap_reader(Box::new(body))?)
}

/// Writes a compressed packet around whatever is written to it.
pub struct CompressedWriter<'a> {
    inner: Box<dyn PacketWrite + 'a>,
}

impl<'a> CompressedWriter<'a> {
    pub fn new(
        inner: Box<dyn PacketWrite + 'a>,
        alg: CompressionAlgorithm,
        level: u32,
        exponent: u8,
        registry: &CodecRegistry,
    ) -> Result<Self, StreamError> {
        // Resolve first so nothing is written for an unknown codec.
        let codec = registry.resolve(alg)?;
        let mut body = PacketBodyWriter::new(inner, PacketTag::CompressedData, exponent)?;
        body.write_all(&[alg as u8])?;
        tracing::debug!(algorithm = alg.name(), level, "compressed data packet");
        Ok(Self { inner: codec.wrap_writer(Box::new(body), level)? })
    }
}

impl Write for CompressedWriter<'_> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.inner.write(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl PacketWrite for CompressedWriter<'_> {
    fn finish(&mut self) -> Result<(), StreamError> {
        self.inner.finish()
    }
}
