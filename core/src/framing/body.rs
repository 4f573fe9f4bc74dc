//! De-framing of a packet body that may span several partial chunks.

use std::io::{self, Read};

use crate::constants::MIN_FIRST_PARTIAL_LEN;
use crate::framing::decode::read_new_length;
use crate::framing::types::{FrameError, PacketLength};
use crate::types::StreamError;

/// Reads the body of one packet, following partial length headers.
///
/// The underlying reader is positioned right after the packet header.
/// Chunk headers are consumed transparently; callers only see body bytes.
pub struct BodyReader<R> {
    inner: R,
    /// Bytes left in the current chunk.
    remaining: u64,
    /// Another chunk header follows the current chunk.
    more: bool,
    indeterminate: bool,
    /// Indeterminate body hit end of stream.
    eof: bool,
    chunks: u64,
    /// Length header bytes consumed after the first chunk.
    header_bytes: u64,
}

impl<R: Read> BodyReader<R> {
    /// Start a body whose first length has already been read.
    ///
    /// A partial first chunk shorter than 512 bytes is rejected.
    pub fn new(inner: R, first: PacketLength) -> Result<Self, FrameError> {
        if let PacketLength::Partial(p) = first {
            let len = 1u64 << p;
            if len < MIN_FIRST_PARTIAL_LEN {
                return Err(FrameError::FirstPartialTooShort { min: MIN_FIRST_PARTIAL_LEN, actual: len });
            }
        }
        let mut body = Self {
            inner,
            remaining: 0,
            more: false,
            indeterminate: false,
            eof: false,
            chunks: 0,
            header_bytes: 0,
        };
        body.enter_chunk(first);
        Ok(body)
    }

    fn enter_chunk(&mut self, len: PacketLength) {
        self.chunks += 1;
        match len {
            PacketLength::Definite(n) => {
                self.remaining = n;
                self.more = false;
            }
            PacketLength::Partial(p) => {
                self.remaining = 1u64 << p;
                self.more = true;
            }
            PacketLength::Indeterminate => {
                self.indeterminate = true;
                self.more = false;
            }
        }
    }

    /// Read up to `buf.len()` body bytes. `Ok(0)` means the body is complete.
    ///
    /// End of stream inside a chunk, or before a promised chunk header, is
    /// `FrameError::Truncated`.
    pub fn read_body(&mut self, buf: &mut [u8]) -> Result<usize, FrameError> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.indeterminate {
            if self.eof {
                return Ok(0);
            }
            let n = read_retrying(&mut self.inner, buf)?;
            if n == 0 {
                self.eof = true;
            }
            return Ok(n);
        }
        while self.remaining == 0 {
            if !self.more {
                return Ok(0);
            }
            let next = read_new_length(&mut self.inner)?;
            self.header_bytes += next.encoded_len() as u64;
            self.enter_chunk(next);
        }
        let want = buf.len().min(usize::try_from(self.remaining).unwrap_or(usize::MAX));
        let n = read_retrying(&mut self.inner, &mut buf[..want])?;
        if n == 0 {
            return Err(FrameError::Truncated);
        }
        self.remaining -= n as u64;
        Ok(n)
    }

    /// Fill `buf` as far as the body allows. Returns the bytes read.
    pub fn read_full(&mut self, buf: &mut [u8]) -> Result<usize, FrameError> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read_body(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(filled)
    }

    /// True once every chunk has been consumed.
    pub fn is_finished(&self) -> bool {
        if self.indeterminate {
            self.eof
        } else {
            self.remaining == 0 && !self.more
        }
    }

    /// Chunks entered so far, the current one included.
    pub fn chunks(&self) -> u64 {
        self.chunks
    }

    /// Length header bytes read after the first chunk.
    pub fn header_bytes(&self) -> u64 {
        self.header_bytes
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

fn read_retrying<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<usize, FrameError> {
    loop {
        match r.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(FrameError::Io(e)),
        }
    }
}

impl<R: Read> Read for BodyReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_body(buf).map_err(|e| match e {
            FrameError::Io(inner) => inner,
            other => io::Error::from(StreamError::Frame(other)),
        })
    }
}
