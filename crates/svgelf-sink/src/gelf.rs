//! GELF 1.1 payload encoding and UDP chunking.

use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;

use crate::error::{Result, SinkError};
use crate::record::LogRecord;

/// Data bytes per chunk. Fits a 1500-byte MTU with IP/UDP/GELF headers.
pub const DEFAULT_CHUNK_SIZE: usize = 1420;

/// Largest usable chunk size: the UDP payload limit (65507) minus the chunk header.
pub const MAX_CHUNK_SIZE: usize = 65507 - CHUNK_HEADER_SIZE;

/// Upper bound on chunks per message imposed by GELF.
pub const MAX_CHUNKS: usize = 128;

/// Chunk magic: 0x1e 0x0f.
pub const CHUNK_MAGIC: [u8; 2] = [0x1e, 0x0f];

/// Chunk header: magic (2) + message id (8) + sequence number (1) + count (1).
pub const CHUNK_HEADER_SIZE: usize = 12;

const GELF_VERSION: &str = "1.1";

#[derive(Serialize)]
struct GelfMessage<'a> {
    version: &'static str,
    host: &'a str,
    short_message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_message: Option<&'a str>,
    timestamp: f64,
    level: u8,
    #[serde(rename = "_logger")]
    logger: &'a str,
    #[serde(rename = "_file")]
    file: &'a str,
    #[serde(rename = "_line")]
    line: u32,
    #[serde(rename = "_pid")]
    pid: u32,
}

/// Serialize a record as an uncompressed GELF 1.1 JSON document.
///
/// `short_message` is the first line of the message; `full_message` is only
/// sent when the message spans several lines.
pub fn encode_message(record: &LogRecord, host: &str, timestamp: f64) -> Result<Vec<u8>> {
    let message = record.message.as_str();
    let short_message = message.lines().next().unwrap_or_default();
    let full_message = message.trim_end().contains('\n').then_some(message);

    let gelf = GelfMessage {
        version: GELF_VERSION,
        host,
        short_message,
        full_message,
        timestamp,
        level: record.severity.syslog_level(),
        logger: &record.logger_name,
        file: &record.source_file,
        line: record.source_line,
        pid: record.process_id,
    };

    Ok(serde_json::to_vec(&gelf)?)
}

/// Split an encoded message into datagrams.
///
/// A message no larger than `chunk_size` is sent as-is. Larger ones are cut
/// into `chunk_size` pieces, each prefixed with a chunk header.
pub fn chunk_message(message: &[u8], chunk_size: usize, message_id: [u8; 8]) -> Result<Vec<Bytes>> {
    check_chunk_size(chunk_size)?;
    if message.len() <= chunk_size {
        return Ok(vec![Bytes::copy_from_slice(message)]);
    }

    let count = message.len().div_ceil(chunk_size);
    if count > MAX_CHUNKS {
        return Err(SinkError::TooManyChunks {
            chunks: count,
            max: MAX_CHUNKS,
        });
    }

    let chunks = message
        .chunks(chunk_size)
        .enumerate()
        .map(|(seq, piece)| {
            let mut buf = BytesMut::with_capacity(CHUNK_HEADER_SIZE + piece.len());
            buf.put_slice(&CHUNK_MAGIC);
            buf.put_slice(&message_id);
            buf.put_u8(seq as u8);
            buf.put_u8(count as u8);
            buf.put_slice(piece);
            buf.freeze()
        })
        .collect();

    Ok(chunks)
}

/// Reject chunk sizes outside `1..=MAX_CHUNK_SIZE`.
pub fn check_chunk_size(chunk_size: usize) -> Result<()> {
    if chunk_size == 0 || chunk_size > MAX_CHUNK_SIZE {
        return Err(SinkError::InvalidChunkSize {
            size: chunk_size,
            max: MAX_CHUNK_SIZE,
        });
    }
    Ok(())
}
