//! stream/literal.rs
//! Literal data packet (tag 11): binary format only.
//!
//! Body: `['b'][name_len][name][mtime: u32 BE][data...]`.

use std::io::{self, Read, Write};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::constants::LITERAL_BINARY;
use crate::framing::PacketTag;
use crate::stream::packet::{PacketBodyReader, PacketBodyWriter, PacketRead, PacketWrite};
use crate::types::StreamError;
use crate::utils::fmt_bytes;

fn header_error(e: io::Error) -> StreamError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        StreamError::Format("truncated literal data header".into())
    } else {
        StreamError::from(e)
    }
}

/// Payload of a literal packet plus its metadata.
pub struct LiteralReader<'a> {
    body: PacketBodyReader<'a>,
    file_name: String,
    modified: u32,
}

impl<'a> LiteralReader<'a> {
    pub fn open(inner: Box<dyn PacketRead + 'a>) -> Result<Self, StreamError> {
        let mut body = PacketBodyReader::open(inner, PacketTag::LiteralData)?;

        let format = body.read_u8().map_err(header_error)?;
        if format != LITERAL_BINARY {
            return Err(StreamError::Format(format!(
                "unsupported literal data format {}",
                fmt_bytes(&[format])
            )));
        }
        let name_len = body.read_u8().map_err(header_error)? as usize;
        let mut name = vec![0u8; name_len];
        body.read_exact(&mut name).map_err(header_error)?;
        let modified = body.read_u32::<BigEndian>().map_err(header_error)?;

        let file_name = String::from_utf8_lossy(&name).into_owned();
        tracing::debug!(file_name = %file_name, modified, "literal data packet");
        Ok(Self { body, file_name, modified })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Modification time in seconds since the epoch; 0 when unset.
    pub fn modified(&self) -> u32 {
        self.modified
    }
}

impl Read for LiteralReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.body.read(buf)
    }
}

impl PacketRead for LiteralReader<'_> {
    fn peek(&mut self) -> Result<Option<u8>, StreamError> {
        self.body.peek()
    }

    fn close(&mut self) -> Result<(), StreamError> {
        self.body.close()
    }
}

pub struct LiteralWriter<'a> {
    body: PacketBodyWriter<'a>,
}

impl<'a> LiteralWriter<'a> {
    /// Write the literal header. File names longer than 255 bytes are rejected.
    pub fn new(
        inner: Box<dyn PacketWrite + 'a>,
        file_name: &str,
        modified: u32,
        exponent: u8,
    ) -> Result<Self, StreamError> {
        let name = file_name.as_bytes();
        let name_len = u8::try_from(name.len()).map_err(|_| {
            StreamError::Validation(format!("file name is {} bytes, at most 255 allowed", name.len()))
        })?;

        let mut body = PacketBodyWriter::new(inner, PacketTag::LiteralData, exponent)?;
        body.write_all(&[LITERAL_BINARY, name_len])?;
        body.write_all(name)?;
        body.write_u32::<BigEndian>(modified)?;
        Ok(Self { body })
    }
}

impl Write for LiteralWriter<'_> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.body.write(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.body.flush()
    }
}

impl PacketWrite for LiteralWriter<'_> {
    fn finish(&mut self) -> Result<(), StreamError> {
        self.body.finish()
    }
}
