//! types.rs
//! Unified stream error covering framing, session key parsing, crypto,
//! compression and transport failures.
//!
//! - `From<T>` impls enable `?` across layers.
//! - A `StreamError` that travels through `Read`/`Write` as an `io::Error`
//!   is recovered intact by `From<io::Error>`.

use std::io;
use thiserror::Error;

use crate::{
    compression::CompressionError,
    crypto::CryptoError,
    framing::FrameError,
    headers::HeaderError,
};

/// Coarse classification callers can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed header, wrong tag byte, unsupported length encoding.
    Format,
    /// Advertised cipher/hash/compression combination is not implemented.
    UnsupportedAlgorithm,
    /// Prefix check failed: the derived key is wrong.
    WrongPassword,
    /// Digest mismatch, missing trailer, truncation or premature close.
    Integrity,
    /// Transport failure.
    Io,
    /// API misuse (closed stream, bad configuration).
    Usage,
}

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("format error: {0}")]
    Format(String),

    #[error("frame error: {0}")]
    Frame(FrameError),

    #[error("session key error: {0}")]
    Header(#[from] HeaderError),

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("wrong password: decryption check failed")]
    WrongPassword,

    #[error("integrity error: {0}")]
    Integrity(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    #[error("I/O error: {0}")]
    Io(io::Error),

    #[error("stream is closed")]
    Closed,

    #[error("validation error: {0}")]
    Validation(String),
}

impl StreamError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StreamError::Format(_) | StreamError::Frame(_) => ErrorKind::Format,
            StreamError::Header(HeaderError::UnsupportedCipher { .. })
            | StreamError::Header(HeaderError::UnsupportedHash { .. }) => {
                ErrorKind::UnsupportedAlgorithm
            }
            StreamError::Header(_) => ErrorKind::Format,
            StreamError::UnsupportedAlgorithm(_) => ErrorKind::UnsupportedAlgorithm,
            StreamError::Compression(CompressionError::UnsupportedAlgorithm { .. }) => {
                ErrorKind::UnsupportedAlgorithm
            }
            StreamError::Compression(_) => ErrorKind::Format,
            StreamError::WrongPassword => ErrorKind::WrongPassword,
            StreamError::Integrity(_) => ErrorKind::Integrity,
            StreamError::Crypto(CryptoError::DigestMismatch) => ErrorKind::Integrity,
            StreamError::Crypto(_) => ErrorKind::Usage,
            StreamError::Io(_) => ErrorKind::Io,
            StreamError::Closed | StreamError::Validation(_) => ErrorKind::Usage,
        }
    }

    /// A new error of `kind`, for reporting an earlier failure again.
    pub fn of_kind(kind: ErrorKind, context: &str) -> Self {
        match kind {
            ErrorKind::Format => StreamError::Format(context.into()),
            ErrorKind::UnsupportedAlgorithm => StreamError::UnsupportedAlgorithm(context.into()),
            ErrorKind::WrongPassword => StreamError::WrongPassword,
            ErrorKind::Integrity => StreamError::Integrity(context.into()),
            ErrorKind::Io => StreamError::Io(io::Error::new(io::ErrorKind::Other, context.to_string())),
            ErrorKind::Usage => StreamError::Validation(context.into()),
        }
    }

    pub fn is_wrong_password(&self) -> bool {
        self.kind() == ErrorKind::WrongPassword
    }

    pub fn is_integrity(&self) -> bool {
        self.kind() == ErrorKind::Integrity
    }
}

impl From<FrameError> for StreamError {
    fn from(e: FrameError) -> Self {
        match e {
            // Transport errors keep their own classification.
            FrameError::Io(inner) => StreamError::from(inner),
            other => StreamError::Frame(other),
        }
    }
}

impl From<io::Error> for StreamError {
    fn from(e: io::Error) -> Self {
        // Unwrap errors we smuggled through Read/Write ourselves.
        if e.get_ref().is_some_and(|inner| inner.is::<StreamError>()) {
            let kind = e.kind();
            return match e.into_inner().map(|inner| inner.downcast::<StreamError>()) {
                Some(Ok(inner)) => *inner,
                Some(Err(other)) => StreamError::Io(io::Error::new(kind, other)),
                None => StreamError::Io(io::Error::from(kind)),
            };
        }
        StreamError::Io(e)
    }
}

impl From<StreamError> for io::Error {
    fn from(e: StreamError) -> Self {
        match e {
            StreamError::Io(inner) => inner,
            other => {
                let kind = match other.kind() {
                    ErrorKind::Usage => io::ErrorKind::Other,
                    _ => io::ErrorKind::InvalidData,
                };
                io::Error::new(kind, other)
            }
        }
    }
}
