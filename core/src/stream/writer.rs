//! stream/writer.rs
//! Encrypting writer: session key packet plus an integrity protected data
//! packet framed in partial chunks.
//!
//! The version byte is the first byte of the first chunk, so every partial
//! chunk on the wire is exactly `2^exponent` bytes. The final chunk carries a
//! definite length and may be empty.

use std::fmt;
use std::io::{self, Write};

use crate::constants::{MDC_MARKER, SEIPD_VERSION};
use crate::crypto::{derive_key, random_prefix, random_salt, CfbCipher, MdcHasher};
use crate::framing::{encode_length, encode_partial, encode_tag, PacketTag};
use crate::headers::{encode_session_key, SessionKeyPacket};
use crate::stream::packet::PacketWrite;
use crate::telemetry::Telemetry;
use crate::types::StreamError;
use crate::utils::{chunk_exponent, chunk_size_for};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    Init,
    Streaming,
    Finalizing,
    Closed,
}

impl fmt::Display for WriterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WriterState::Init       => "init",
            WriterState::Streaming  => "streaming",
            WriterState::Finalizing => "finalizing",
            WriterState::Closed     => "closed",
        };
        f.write_str(name)
    }
}

pub struct EncryptWriter<W: Write> {
    out: W,
    cipher: CfbCipher,
    mdc: MdcHasher,
    /// Ciphertext of the chunk being assembled.
    buf: Vec<u8>,
    exponent: u8,
    state: WriterState,
    telemetry: Telemetry,
}

impl<W: Write> EncryptWriter<W> {
    /// Write the session key packet and the start of the data packet.
    pub fn open(
        mut out: W,
        password: &[u8],
        chunk_size: usize,
        count_byte: u8,
        telemetry: Telemetry,
    ) -> Result<Self, StreamError> {
        let exponent = chunk_exponent(chunk_size);
        let chunk = chunk_size_for(exponent);
        tracing::debug!(state = %WriterState::Init, chunk, count_byte, "opening encrypting writer");

        let params = SessionKeyPacket::new(random_salt(), count_byte);
        let cipher = {
            let key = derive_key(password, &params.salt, params.iteration_count())?;
            CfbCipher::new(&key[..])?
        };
        out.write_all(&encode_session_key(&params))?;
        out.write_all(&[encode_tag(PacketTag::EncryptedIntegrityData)])?;
        telemetry.record(|c| c.add_overhead(SessionKeyPacket::LEN + 1));

        let mut buf = Vec::with_capacity(chunk);
        buf.push(SEIPD_VERSION);
        let mut w = Self {
            out,
            cipher,
            mdc: MdcHasher::new(),
            buf,
            exponent,
            state: WriterState::Init,
            telemetry,
        };
        w.telemetry.record(|c| c.add_ciphertext(1));

        let prefix = zeroize::Zeroizing::new(random_prefix());
        w.mdc.update(&prefix[..]);
        w.push_encrypted(&prefix[..])?;

        w.state = WriterState::Streaming;
        Ok(w)
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn emit_partial(&mut self) -> Result<(), StreamError> {
        let len_byte = encode_partial(self.exponent)?;
        self.out.write_all(&[len_byte])?;
        self.out.write_all(&self.buf)?;
        tracing::trace!(bytes = self.buf.len(), "partial chunk written");
        self.telemetry.record(|c| {
            c.add_overhead(1);
            c.add_chunk(true);
        });
        self.buf.clear();
        Ok(())
    }

    /// Encrypt `data` into the chunk buffer, emitting full chunks as they fill.
    fn push_encrypted(&mut self, data: &[u8]) -> Result<(), StreamError> {
        let chunk = chunk_size_for(self.exponent);
        let mut rest = data;
        while !rest.is_empty() {
            let take = (chunk - self.buf.len()).min(rest.len());
            let start = self.buf.len();
            self.buf.extend_from_slice(&rest[..take]);
            self.cipher.encrypt(&mut self.buf[start..])?;
            self.telemetry.record(|c| c.add_ciphertext(take));
            rest = &rest[take..];
            if self.buf.len() == chunk {
                self.emit_partial()?;
            }
        }
        Ok(())
    }

    fn write_plain(&mut self, data: &[u8]) -> Result<usize, StreamError> {
        if self.state != WriterState::Streaming {
            return Err(StreamError::Closed);
        }
        self.mdc.update(data);
        self.push_encrypted(data)?;
        self.telemetry.record(|c| c.add_plaintext(data.len()));
        Ok(data.len())
    }
}

impl<W: Write> Write for EncryptWriter<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        Ok(self.write_plain(data)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl<W: Write> PacketWrite for EncryptWriter<W> {
    /// Append the MDC, write the final chunk and flush the sink.
    fn finish(&mut self) -> Result<(), StreamError> {
        if self.state != WriterState::Streaming {
            return Err(StreamError::Closed);
        }
        self.state = WriterState::Finalizing;

        self.mdc.update(&MDC_MARKER);
        self.push_encrypted(&MDC_MARKER)?;
        let digest = self.mdc.finalize_digest()?;
        self.push_encrypted(&digest)?;

        // buf.len() < chunk <= 2^30
        let header = encode_length(self.buf.len() as u32);
        self.out.write_all(&header)?;
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        self.telemetry.record(|c| {
            c.add_overhead(header.len());
            c.add_chunk(false);
        });
        tracing::debug!(final_chunk = self.buf.len(), "encrypted stream finished");

        self.buf.clear();
        self.cipher.finalize();
        self.state = WriterState::Closed;
        Ok(())
    }
}

impl<W: Write> Drop for EncryptWriter<W> {
    fn drop(&mut self) {
        if self.state != WriterState::Closed {
            tracing::warn!(state = %self.state, "encrypting writer dropped before finish; output is incomplete");
        }
    }
}
