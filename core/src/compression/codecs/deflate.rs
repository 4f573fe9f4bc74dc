//! Raw deflate (ZIP, algorithm 1) and zlib (algorithm 2) via flate2.

use std::io::{self, Read, Write};
use flate2::Compression;
use flate2::read::{DeflateDecoder, ZlibDecoder};
use flate2::write::{DeflateEncoder, ZlibEncoder};

use crate::compression::types::{CompressionError, Compressor, Decompressor};
use crate::stream::packet::{Lookahead, PacketRead, PacketWrite};
use crate::types::StreamError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlateFormat {
    /// RFC 1951 without framing.
    Raw,
    /// RFC 1950 header and adler32 trailer.
    Zlib,
}

impl FlateFormat {
    fn name(self) -> &'static str {
        match self {
            FlateFormat::Raw => "zip",
            FlateFormat::Zlib => "zlib",
        }
    }
}

pub struct FlateCodec {
    format: FlateFormat,
}

impl FlateCodec {
    pub fn new(format: FlateFormat) -> Self {
        Self { format }
    }
}

impl Compressor for FlateCodec {
    fn wrap_writer<'a>(
        &self,
        inner: Box<dyn PacketWrite + 'a>,
        level: u32,
    ) -> Result<Box<dyn PacketWrite + 'a>, CompressionError> {
        if level > 9 {
            return Err(CompressionError::InvalidLevel { codec: self.format.name(), level });
        }
        let lvl = Compression::new(level);
        let enc = match self.format {
            FlateFormat::Raw => Encoder::Raw(DeflateEncoder::new(inner, lvl)),
            FlateFormat::Zlib => Encoder::Zlib(ZlibEncoder::new(inner, lvl)),
        };
        Ok(Box::new(FlateWriter { enc: Some(enc) }))
    }
}

impl Decompressor for FlateCodec {
    fn wrap_reader<'a>(
        &self,
        inner: Box<dyn PacketRead + 'a>,
    ) -> Result<Box<dyn PacketRead + 'a>, CompressionError> {
        let dec = match self.format {
            FlateFormat::Raw => Decoder::Raw(DeflateDecoder::new(inner)),
            FlateFormat::Zlib => Decoder::Zlib(ZlibDecoder::new(inner)),
        };
        Ok(Box::new(FlateReader { dec: Lookahead::new(dec), codec: self.format.name() }))
    }
}

enum Encoder<'a> {
    Raw(DeflateEncoder<Box<dyn PacketWrite + 'a>>),
    Zlib(ZlibEncoder<Box<dyn PacketWrite + 'a>>),
}

struct FlateWriter<'a> {
    enc: Option<Encoder<'a>>,
}

impl Write for FlateWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.enc.as_mut() {
            Some(Encoder::Raw(e)) => e.write(buf),
            Some(Encoder::Zlib(e)) => e.write(buf),
            None => Err(StreamError::Closed.into()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.enc.as_mut() {
            Some(Encoder::Raw(e)) => e.flush(),
            Some(Encoder::Zlib(e)) => e.flush(),
            None => Ok(()),
        }
    }
}

impl PacketWrite for FlateWriter<'_> {
    fn finish(&mut self) -> Result<(), StreamError> {
        let mut inner = match self.enc.take().ok_or(StreamError::Closed)? {
            Encoder::Raw(e) => e.finish()?,
            Encoder::Zlib(e) => e.finish()?,
        };
        inner.finish()
    }
}

enum Decoder<'a> {
    Raw(DeflateDecoder<Box<dyn PacketRead + 'a>>),
    Zlib(ZlibDecoder<Box<dyn PacketRead + 'a>>),
}

impl<'a> Decoder<'a> {
    fn inner_mut(&mut self) -> &mut Box<dyn PacketRead + 'a> {
        match self {
            Decoder::Raw(d) => d.get_mut(),
            Decoder::Zlib(d) => d.get_mut(),
        }
    }
}

impl Read for Decoder<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Decoder::Raw(d) => d.read(buf),
            Decoder::Zlib(d) => d.read(buf),
        }
    }
}

struct FlateReader<'a> {
    dec: Lookahead<Decoder<'a>>,
    codec: &'static str,
}

impl FlateReader<'_> {
    /// Corrupt compressed data becomes a compression error; errors raised
    /// by lower layers pass through untouched.
    fn classify(&self, e: io::Error) -> io::Error {
        let ours = e.get_ref().is_some_and(|inner| inner.is::<StreamError>());
        if ours || !matches!(e.kind(), io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData) {
            return e;
        }
        StreamError::Compression(CompressionError::CodecFailed {
            codec: self.codec,
            msg: e.to_string(),
        })
        .into()
    }
}

impl Read for FlateReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.dec.read(buf).map_err(|e| self.classify(e))
    }
}

impl PacketRead for FlateReader<'_> {
    fn peek(&mut self) -> Result<Option<u8>, StreamError> {
        let peeked = self.dec.peek().map_err(|e| self.classify(e))?;
        Ok(peeked)
    }

    fn close(&mut self) -> Result<(), StreamError> {
        let pending = self.peek();
        self.dec.get_mut().inner_mut().close()?;
        match pending? {
            None => Ok(()),
            Some(_) => Err(StreamError::Integrity(format!(
                "premature close: unread {} data", self.codec
            ))),
        }
    }
}
