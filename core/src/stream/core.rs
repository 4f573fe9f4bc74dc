//! stream/core.rs
//! Public entry points: layered reader/writer factories and one-shot
//! encrypt/decrypt helpers.
//!
//! Write stack: literal → compressed → encrypted → sink.
//! Read stack: source → decrypt → (decompress) → literal. A compressed
//! layer is optional on read and detected from the first plaintext byte.

use std::io::{self, Read, Write};

use crate::compression::CodecRegistry;
use crate::framing::{is_packet_tag, PacketTag};
use crate::stream::compressed::{open_compressed, CompressedWriter};
use crate::stream::config::StreamConfig;
use crate::stream::io::{open_input, open_output, take_shared, InputSource, OutputSink};
use crate::stream::literal::{LiteralReader, LiteralWriter};
use crate::stream::packet::{PacketRead, PacketWrite};
use crate::stream::reader::DecryptReader;
use crate::stream::writer::EncryptWriter;
use crate::telemetry::{Stage, Telemetry, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;

/// Open an encrypted message for reading.
///
/// Data read from the returned reader is only authenticated once `close()`
/// returns `Ok`.
pub fn open_reader<'a, R: Read + 'a>(
    input: R,
    password: &[u8],
    config: &StreamConfig,
    registry: &CodecRegistry,
) -> Result<LiteralReader<'a>, StreamError> {
    open_reader_with_telemetry(input, password, config, registry, Telemetry::new())
}

pub fn open_reader_with_telemetry<'a, R: Read + 'a>(
    input: R,
    password: &[u8],
    config: &StreamConfig,
    registry: &CodecRegistry,
    telemetry: Telemetry,
) -> Result<LiteralReader<'a>, StreamError> {
    let mut decrypted: Box<dyn PacketRead + 'a> =
        Box::new(DecryptReader::open(input, password, config.chunk_size, telemetry)?);

    let first = decrypted
        .peek()?
        .ok_or_else(|| StreamError::Format("encrypted message contains no packet".into()))?;

    let layer = if is_packet_tag(first, PacketTag::CompressedData) {
        open_compressed(decrypted, registry)?
    } else {
        decrypted
    };
    LiteralReader::open(layer)
}

/// Start a new encrypted message. Call `finish()` on the result when done.
pub fn open_writer<'a, W: Write + 'a>(
    output: W,
    password: &[u8],
    config: &StreamConfig,
    registry: &CodecRegistry,
) -> Result<LiteralWriter<'a>, StreamError> {
    open_writer_with_telemetry(output, password, config, registry, Telemetry::new())
}

pub fn open_writer_with_telemetry<'a, W: Write + 'a>(
    output: W,
    password: &[u8],
    config: &StreamConfig,
    registry: &CodecRegistry,
    telemetry: Telemetry,
) -> Result<LiteralWriter<'a>, StreamError> {
    config.validate()?;
    let exponent = config.chunk_exponent();

    let encrypted: Box<dyn PacketWrite + 'a> = Box::new(EncryptWriter::open(
        output,
        password,
        config.chunk_size,
        config.s2k_count_byte,
        telemetry,
    )?);
    let compressed: Box<dyn PacketWrite + 'a> = Box::new(CompressedWriter::new(
        encrypted,
        config.compression,
        config.compression_level,
        exponent,
        registry,
    )?);
    LiteralWriter::new(compressed, &config.file_name, config.modified, exponent)
}

/// 🔐 Encrypt everything from `input` into `output`.
pub fn encrypt_stream(
    input: InputSource,
    output: OutputSink,
    password: &[u8],
    config: StreamConfig,
) -> Result<TelemetrySnapshot, StreamError> {
    encrypt_stream_with_registry(input, output, password, config, &CodecRegistry::with_defaults())
}

pub fn encrypt_stream_with_registry(
    input: InputSource,
    output: OutputSink,
    password: &[u8],
    config: StreamConfig,
    registry: &CodecRegistry,
) -> Result<TelemetrySnapshot, StreamError> {
    config.validate()?;
    let mut reader = open_input(input)?;
    let (writer, maybe_buf) = open_output(output)?;

    let telemetry = Telemetry::new();
    let mut timer = TelemetryTimer::new();

    let mut w = timer.time(Stage::Open, || {
        open_writer_with_telemetry(writer, password, &config, registry, telemetry.clone())
    })?;
    timer.time(Stage::Transfer, || io::copy(&mut reader, &mut w))?;
    timer.time(Stage::Close, || w.finish())?;
    drop(w);
    timer.finish();

    let mut snapshot = TelemetrySnapshot::from(&telemetry.counters(), &timer);
    if let Some(ref buf) = maybe_buf {
        snapshot.attach_output(take_shared(buf));
    }
    tracing::debug!(
        plaintext = snapshot.bytes_plaintext,
        wire = snapshot.wire_bytes(),
        "encrypt_stream done"
    );
    Ok(snapshot)
}

/// 🔓 Decrypt a message from `input` into `output`.
///
/// Plaintext reaches `output` before the MDC is checked; an `Err` return
/// means whatever was written must be discarded.
pub fn decrypt_stream(
    input: InputSource,
    output: OutputSink,
    password: &[u8],
    config: StreamConfig,
) -> Result<TelemetrySnapshot, StreamError> {
    decrypt_stream_with_registry(input, output, password, config, &CodecRegistry::with_defaults())
}

pub fn decrypt_stream_with_registry(
    input: InputSource,
    output: OutputSink,
    password: &[u8],
    config: StreamConfig,
    registry: &CodecRegistry,
) -> Result<TelemetrySnapshot, StreamError> {
    let reader = open_input(input)?;
    let (mut writer, maybe_buf) = open_output(output)?;

    let telemetry = Telemetry::new();
    let mut timer = TelemetryTimer::new();

    let mut r = timer.time(Stage::Open, || {
        open_reader_with_telemetry(reader, password, &config, registry, telemetry.clone())
    })?;
    timer.time(Stage::Transfer, || io::copy(&mut r, &mut writer))?;
    timer.time(Stage::Close, || r.close())?;
    writer.flush()?;
    drop(r);
    timer.finish();

    let mut snapshot = TelemetrySnapshot::from(&telemetry.counters(), &timer);
    if let Some(ref buf) = maybe_buf {
        snapshot.attach_output(take_shared(buf));
    }
    tracing::debug!(plaintext = snapshot.bytes_plaintext, "decrypt_stream done");
    Ok(snapshot)
}
