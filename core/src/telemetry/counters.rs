//! telemetry/counters.rs
//! Mutable counters updated by the encrypting writer and decrypting reader.

use std::ops::AddAssign;
use std::sync::{Arc, Mutex};

/// Counters for one message.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct TelemetryCounters {
    /// Plaintext carried inside the integrity protected packet
    /// (inner packet headers included, prefix and MDC excluded).
    pub bytes_plaintext: u64,
    /// Integrity protected packet body: version byte, prefix, payload and MDC.
    pub bytes_ciphertext: u64,
    /// Session key packet, data packet tag and length headers.
    pub bytes_overhead: u64,
    pub chunks_partial: u64,
    pub chunks_final: u64,
}

impl TelemetryCounters {
    /// Structural bytes such as the session key packet or a length header.
    pub fn add_overhead(&mut self, len: usize) {
        self.bytes_overhead += len as u64;
    }

    pub fn add_plaintext(&mut self, len: usize) {
        self.bytes_plaintext += len as u64;
    }

    pub fn add_ciphertext(&mut self, len: usize) {
        self.bytes_ciphertext += len as u64;
    }

    /// One body chunk seen on the wire; `partial` tells whether more follow.
    pub fn add_chunk(&mut self, partial: bool) {
        if partial {
            self.chunks_partial += 1;
        } else {
            self.chunks_final += 1;
        }
    }

    /// Total bytes of the encrypted message as written/read.
    pub fn wire_bytes(&self) -> u64 {
        self.bytes_ciphertext + self.bytes_overhead
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.bytes_plaintext  += rhs.bytes_plaintext;
        self.bytes_ciphertext += rhs.bytes_ciphertext;
        self.bytes_overhead   += rhs.bytes_overhead;
        self.chunks_partial   += rhs.chunks_partial;
        self.chunks_final     += rhs.chunks_final;
    }
}

/// Shared handle to a message's counters.
#[derive(Clone, Debug, Default)]
pub struct Telemetry {
    inner: Arc<Mutex<TelemetryCounters>>,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `f` to the counters. A poisoned lock drops the update.
    pub fn record<F: FnOnce(&mut TelemetryCounters)>(&self, f: F) {
        if let Ok(mut guard) = self.inner.lock() {
            f(&mut guard);
        }
    }

    /// Copy of the current counters.
    pub fn counters(&self) -> TelemetryCounters {
        match self.inner.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
