//! stream/reader.rs
//! Decrypting reader for a session key packet followed by an integrity
//! protected data packet.
//!
//! Plaintext inside the data packet is `prefix(18) ∥ payload ∥ D3 14 ∥ sha1(20)`.
//! The last 22 bytes are only known to be the trailer once the packet body
//! is exhausted, so at least that many decrypted bytes are always held back
//! until then. Payload bytes enter the MDC when they are released, the held
//! back tail is hashed once at verification.

use std::fmt;
use std::io::{self, BufReader, Read};

use byteorder::ReadBytesExt;
use zeroize::{Zeroize, Zeroizing};

use crate::constants::{MDC_MARKER, PREFIX_LEN, SEIPD_VERSION, TRAILER_HEADROOM, TRAILER_LEN};
use crate::crypto::{check_prefix, derive_key, CfbCipher, MdcHasher};
use crate::framing::{encode_tag, read_new_length, BodyReader, FrameError, PacketTag};
use crate::headers::{decode_session_key, SessionKeyPacket};
use crate::stream::packet::PacketRead;
use crate::telemetry::Telemetry;
use crate::types::{ErrorKind, StreamError};
use crate::utils::{chunk_exponent, chunk_size_for, fmt_bytes};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    ParsingSessionKey,
    DerivingKey,
    VerifyingPrefix,
    /// Payload is being released; the body has more ciphertext.
    Streaming,
    /// Body exhausted; the held back tail must be exactly the trailer.
    AwaitingTrailer,
    /// Body exhausted, trailer verified; remaining payload may still be read.
    Verified,
    /// Verification or I/O failed. Terminal.
    Failed,
    Closed,
}

impl fmt::Display for ReaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReaderState::ParsingSessionKey => "parsing-session-key",
            ReaderState::DerivingKey       => "deriving-key",
            ReaderState::VerifyingPrefix   => "verifying-prefix",
            ReaderState::Streaming         => "streaming",
            ReaderState::AwaitingTrailer   => "awaiting-trailer",
            ReaderState::Verified          => "verified",
            ReaderState::Failed            => "failed",
            ReaderState::Closed            => "closed",
        };
        f.write_str(name)
    }
}

/// Decrypted bytes not yet handed to the caller.
///
/// Capacity is one chunk plus `TRAILER_HEADROOM`; a fill only happens while
/// at most `TRAILER_LEN` bytes are pending, so a full chunk always fits.
struct PlainBuffer {
    buf: Zeroizing<Vec<u8>>,
    start: usize,
    end: usize,
}

impl PlainBuffer {
    fn new(chunk: usize) -> Self {
        Self {
            buf: Zeroizing::new(vec![0u8; chunk + TRAILER_HEADROOM]),
            start: 0,
            end: 0,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    fn pending(&self) -> &[u8] {
        &self.buf[self.start..self.end]
    }

    /// Move pending bytes to the front and return the free tail.
    fn compact(&mut self) -> &mut [u8] {
        if self.start > 0 {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }
        &mut self.buf[self.end..]
    }

    fn wipe(&mut self) {
        self.buf[..].zeroize();
        self.start = 0;
        self.end = 0;
    }
}

/// Pull side of the encryption layer. Yields verified plaintext.
///
/// Bytes returned before the end of the stream are not yet authenticated:
/// the MDC is only checked when the packet body has been consumed. A reader
/// must treat the data as trustworthy only after `close()` succeeds.
pub struct DecryptReader<R> {
    body: BodyReader<BufReader<R>>,
    cipher: CfbCipher,
    mdc: MdcHasher,
    plain: PlainBuffer,
    chunk: usize,
    state: ReaderState,
    /// Kind of the error that moved the reader to `Failed`.
    failure: Option<ErrorKind>,
    telemetry: Telemetry,
}

impl<R: Read> DecryptReader<R> {
    /// Parse the headers, derive the key and check the prefix.
    ///
    /// Errors:
    /// - malformed session key or data packet header: `Format`
    /// - other cipher or S2K hash: `UnsupportedAlgorithm`
    /// - prefix check failed: `WrongPassword`
    pub fn open(input: R, password: &[u8], chunk_size: usize, telemetry: Telemetry) -> Result<Self, StreamError> {
        let chunk = chunk_size_for(chunk_exponent(chunk_size));
        let mut src = BufReader::with_capacity(chunk, input);

        let mut state = ReaderState::ParsingSessionKey;
        tracing::trace!(%state, "opening encrypted stream");
        let mut sk = [0u8; SessionKeyPacket::LEN];
        src.read_exact(&mut sk).map_err(|e| truncated_as(e, "session key packet"))?;
        let params = decode_session_key(&sk)?;

        state = ReaderState::DerivingKey;
        tracing::debug!(%state, count = params.iteration_count(), "deriving key");
        let cipher = {
            let key = derive_key(password, &params.salt, params.iteration_count())?;
            CfbCipher::new(&key[..])?
        };

        let tag = src.read_u8().map_err(|e| truncated_as(e, "data packet header"))?;
        if tag != encode_tag(PacketTag::EncryptedIntegrityData) {
            return Err(StreamError::Format(format!(
                "expected integrity protected data packet, got tag byte {}",
                fmt_bytes(&[tag])
            )));
        }
        let first = read_new_length(&mut src).map_err(|e| frame_as_format(e, "data packet length"))?;
        let mut body = BodyReader::new(src, first)?;
        telemetry.record(|c| c.add_overhead(SessionKeyPacket::LEN + 1 + first.encoded_len()));

        let mut version = [0u8; 1];
        if body.read_full(&mut version).map_err(|e| frame_as_format(e, "data packet version"))? != 1 {
            return Err(StreamError::Format("empty integrity protected data packet".into()));
        }
        if version[0] != SEIPD_VERSION {
            return Err(StreamError::Format(format!(
                "unsupported integrity protected data packet version {}",
                version[0]
            )));
        }

        state = ReaderState::VerifyingPrefix;
        tracing::trace!(%state);
        let mut reader = Self {
            body,
            cipher,
            mdc: MdcHasher::new(),
            plain: PlainBuffer::new(chunk),
            chunk,
            state,
            failure: None,
            telemetry,
        };

        let mut prefix = Zeroizing::new([0u8; PREFIX_LEN]);
        let got = reader.body.read_full(&mut prefix[..]).map_err(frame_as_integrity)?;
        if got < PREFIX_LEN {
            return Err(StreamError::Integrity("stream ends inside the encryption prefix".into()));
        }
        reader.cipher.decrypt(&mut prefix[..])?;
        if !check_prefix(&prefix) {
            tracing::debug!("prefix check failed");
            return Err(StreamError::WrongPassword);
        }
        reader.mdc.update(&prefix[..]);
        reader.telemetry.record(|c| c.add_ciphertext(1 + PREFIX_LEN));

        reader.state = ReaderState::Streaming;
        tracing::debug!(chunk, "encrypted stream opened");
        Ok(reader)
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    fn fail(&mut self, err: StreamError) -> StreamError {
        tracing::warn!(error = %err, "decryption failed");
        self.state = ReaderState::Failed;
        self.failure = Some(err.kind());
        self.plain.wipe();
        self.cipher.finalize();
        err
    }

    /// Decrypt the next slice of ciphertext into the plaintext buffer.
    fn fill(&mut self) -> Result<usize, StreamError> {
        let chunk = self.chunk;
        let space = self.plain.compact();
        let want = chunk.min(space.len());
        let n = self.body.read_body(&mut space[..want]).map_err(frame_as_integrity)?;
        let new_bytes = &mut self.plain.buf[self.plain.end..self.plain.end + n];
        self.cipher.decrypt(new_bytes)?;
        self.plain.end += n;
        self.telemetry.record(|c| c.add_ciphertext(n));
        tracing::trace!(bytes = n, pending = self.plain.len(), "decrypted");
        Ok(n)
    }

    /// Hash the held back tail, check marker and digest, strip the trailer.
    fn verify_trailer(&mut self) -> Result<(), StreamError> {
        let pending = self.plain.len();
        if pending < TRAILER_LEN {
            return Err(StreamError::Integrity(
                "stream ends before the modification detection code".into(),
            ));
        }
        let payload = pending - TRAILER_LEN;
        let tail = self.plain.pending();
        self.mdc.update(&tail[..payload + MDC_MARKER.len()]);
        let marker_ok = tail[payload..payload + MDC_MARKER.len()] == MDC_MARKER;
        let digest_ok = self.mdc.verify(&tail[payload + MDC_MARKER.len()..]).is_ok();
        if !marker_ok {
            return Err(StreamError::Integrity("malformed modification detection code packet".into()));
        }
        if !digest_ok {
            return Err(StreamError::Integrity("modification detected: digest mismatch".into()));
        }

        let end = self.plain.end;
        self.plain.buf[end - TRAILER_LEN..end].zeroize();
        self.plain.end -= TRAILER_LEN;
        self.cipher.finalize();
        self.state = ReaderState::Verified;

        let chunks = self.body.chunks();
        let headers = self.body.header_bytes();
        self.telemetry.record(|c| {
            c.bytes_overhead += headers;
            c.chunks_partial += chunks.saturating_sub(1);
            c.chunks_final += 1;
        });
        tracing::debug!(chunks, "modification detection code verified");
        Ok(())
    }

    /// Number of bytes that may be released now; 0 only at verified end.
    fn ensure_available(&mut self) -> Result<usize, StreamError> {
        loop {
            match self.state {
                ReaderState::Verified => return Ok(self.plain.len()),
                ReaderState::Failed => {
                    let kind = self.failure.unwrap_or(ErrorKind::Integrity);
                    return Err(StreamError::of_kind(kind, "stream failed earlier"));
                }
                ReaderState::Closed => return Err(StreamError::Closed),
                _ => {}
            }

            let step = if self.body.is_finished() {
                self.state = ReaderState::AwaitingTrailer;
                tracing::trace!(state = %self.state, pending = self.plain.len());
                self.verify_trailer()
            } else if self.plain.len() > TRAILER_LEN {
                return Ok(self.plain.len() - TRAILER_LEN);
            } else {
                self.fill().map(|_| ())
            };
            if let Err(e) = step {
                return Err(self.fail(e));
            }
        }
    }

    /// Hand out up to `n` pending bytes, feeding the MDC while streaming.
    fn release(&mut self, n: usize) -> &[u8] {
        let start = self.plain.start;
        if self.state == ReaderState::Streaming {
            self.mdc.update(&self.plain.buf[start..start + n]);
        }
        self.plain.start += n;
        self.telemetry.record(|c| c.add_plaintext(n));
        &self.plain.buf[start..start + n]
    }

    fn read_plain(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        if buf.is_empty() {
            return Ok(0);
        }
        let avail = self.ensure_available()?;
        let n = avail.min(buf.len());
        buf[..n].copy_from_slice(self.release(n));
        Ok(n)
    }
}

impl<R: Read> Read for DecryptReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_plain(buf)?)
    }
}

impl<R: Read> PacketRead for DecryptReader<R> {
    fn peek(&mut self) -> Result<Option<u8>, StreamError> {
        if self.ensure_available()? == 0 {
            return Ok(None);
        }
        Ok(Some(self.plain.pending()[0]))
    }

    /// Drain what is left, verify, and fail if the caller left data unread.
    fn close(&mut self) -> Result<(), StreamError> {
        let mut unread = 0usize;
        loop {
            let avail = match self.ensure_available() {
                Ok(n) => n,
                // A second close after success is a no-op.
                Err(StreamError::Closed) => return Ok(()),
                Err(e) => return Err(e),
            };
            if avail == 0 {
                break;
            }
            self.release(avail);
            unread += avail;
        }
        self.plain.wipe();
        self.state = ReaderState::Closed;
        if unread > 0 {
            tracing::warn!(unread, "closed before end of plaintext");
            return Err(StreamError::Integrity(format!(
                "premature close: {} bytes of plaintext left unread",
                unread
            )));
        }
        Ok(())
    }
}

impl<R> Drop for DecryptReader<R> {
    fn drop(&mut self) {
        self.plain.wipe();
    }
}

fn truncated_as(e: io::Error, what: &str) -> StreamError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        StreamError::Format(format!("truncated {}", what))
    } else {
        StreamError::from(e)
    }
}

fn frame_as_format(e: FrameError, what: &str) -> StreamError {
    match e {
        FrameError::Truncated => StreamError::Format(format!("truncated {}", what)),
        other => StreamError::from(other),
    }
}

/// Inside the encrypted body a short read means the ciphertext was cut.
fn frame_as_integrity(e: FrameError) -> StreamError {
    match e {
        FrameError::Truncated => StreamError::Integrity("truncated ciphertext".into()),
        other => StreamError::from(other),
    }
}
