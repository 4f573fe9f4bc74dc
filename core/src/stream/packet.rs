//! stream/packet.rs
//! Layer contracts and generic packet body framing.
//!
//! Layers are stacked by ownership: an outer layer owns a boxed inner layer
//! and closing/finishing the outer one cascades inwards. This is how the
//! MDC verification at the bottom of the read stack surfaces at the top.

use std::io::{self, Read, Write};

use crate::framing::{encode_length, encode_partial, encode_tag, read_header, BodyReader, PacketTag};
use crate::types::StreamError;
use crate::utils::chunk_size_for;

/// Readable layer with one byte of lookahead and an explicit close.
pub trait PacketRead: Read {
    /// Next byte without consuming it; `None` at end of data.
    fn peek(&mut self) -> Result<Option<u8>, StreamError>;

    /// Finish reading. Fails when data was left unread or verification fails.
    fn close(&mut self) -> Result<(), StreamError>;
}

/// Writable layer with an explicit finish that emits trailers.
pub trait PacketWrite: Write {
    /// Flush buffered data, write trailers and finish inner layers.
    fn finish(&mut self) -> Result<(), StreamError>;
}

/// One byte pushback over any reader.
pub struct Lookahead<R> {
    inner: R,
    byte: Option<u8>,
}

impl<R: Read> Lookahead<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, byte: None }
    }

    pub fn peek(&mut self) -> io::Result<Option<u8>> {
        if let Some(b) = self.byte {
            return Ok(Some(b));
        }
        let mut one = [0u8; 1];
        loop {
            match self.inner.read(&mut one) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.byte = Some(one[0]);
                    return Ok(Some(one[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for Lookahead<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if let Some(b) = self.byte.take() {
            buf[0] = b;
            return Ok(1);
        }
        self.inner.read(buf)
    }
}

/// Body of one packet read from an inner layer.
///
/// Accepts new and old format headers of the expected tag, partial chunks
/// (first one >= 512 bytes) and indeterminate lengths.
pub struct PacketBodyReader<'a> {
    body: Lookahead<BodyReader<Box<dyn PacketRead + 'a>>>,
    tag: PacketTag,
}

impl<'a> PacketBodyReader<'a> {
    pub fn open(mut inner: Box<dyn PacketRead + 'a>, expected: PacketTag) -> Result<Self, StreamError> {
        let header = read_header(&mut inner, expected)?;
        tracing::trace!(tag = %expected, length = ?header.length, "packet body opened");
        let body = BodyReader::new(inner, header.length)?;
        Ok(Self { body: Lookahead::new(body), tag: expected })
    }

    pub fn tag(&self) -> PacketTag {
        self.tag
    }
}

impl Read for PacketBodyReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.body.read(buf)
    }
}

impl PacketRead for PacketBodyReader<'_> {
    fn peek(&mut self) -> Result<Option<u8>, StreamError> {
        Ok(self.body.peek()?)
    }

    fn close(&mut self) -> Result<(), StreamError> {
        let pending = self.body.peek();
        self.body.get_mut().get_mut().close()?;
        match pending? {
            None => Ok(()),
            Some(_) => Err(StreamError::Integrity(format!(
                "premature close: unread data in {} packet", self.tag
            ))),
        }
    }
}

/// Writes one packet: new format tag, then the body in partial chunks of
/// `2^exponent` bytes and a definite final chunk.
pub struct PacketBodyWriter<'a> {
    inner: Box<dyn PacketWrite + 'a>,
    buf: Vec<u8>,
    exponent: u8,
    finished: bool,
}

impl<'a> PacketBodyWriter<'a> {
    pub fn new(
        mut inner: Box<dyn PacketWrite + 'a>,
        tag: PacketTag,
        exponent: u8,
    ) -> Result<Self, StreamError> {
        encode_partial(exponent)?;
        inner.write_all(&[encode_tag(tag)])?;
        Ok(Self {
            inner,
            buf: Vec::with_capacity(chunk_size_for(exponent)),
            exponent,
            finished: false,
        })
    }

    fn emit_partial(&mut self) -> Result<(), StreamError> {
        let len_byte = encode_partial(self.exponent)?;
        self.inner.write_all(&[len_byte])?;
        self.inner.write_all(&self.buf)?;
        self.buf.clear();
        Ok(())
    }

    fn write_body(&mut self, data: &[u8]) -> Result<usize, StreamError> {
        if self.finished {
            return Err(StreamError::Closed);
        }
        let chunk = chunk_size_for(self.exponent);
        let mut rest = data;
        while !rest.is_empty() {
            let take = (chunk - self.buf.len()).min(rest.len());
            self.buf.extend_from_slice(&rest[..take]);
            rest = &rest[take..];
            if self.buf.len() == chunk {
                self.emit_partial()?;
            }
        }
        Ok(data.len())
    }
}

impl Write for PacketBodyWriter<'_> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        Ok(self.write_body(data)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl PacketWrite for PacketBodyWriter<'_> {
    fn finish(&mut self) -> Result<(), StreamError> {
        if self.finished {
            return Err(StreamError::Closed);
        }
        self.finished = true;
        // buf.len() < chunk <= 2^30
        self.inner.write_all(&encode_length(self.buf.len() as u32))?;
        self.inner.write_all(&self.buf)?;
        self.buf.clear();
        self.inner.finish()
    }
}
