//! Log record dispatch.
//!
//! Turns a decoded event into exactly one [`LogRecord`] and hands it to a
//! [`LogSink`]. The bundled [`GelfUdpSink`] sends records as GELF 1.1 JSON
//! datagrams, chunked when they exceed the configured size.

pub mod dispatcher;
pub mod error;
pub mod gelf;
pub mod hostname;
pub mod record;
pub mod sink;
pub mod udp;

pub use dispatcher::Dispatcher;
pub use error::{Result, SinkError};
pub use gelf::{
    check_chunk_size, chunk_message, encode_message, DEFAULT_CHUNK_SIZE, MAX_CHUNKS, MAX_CHUNK_SIZE,
};
pub use record::LogRecord;
pub use sink::{LogSink, MemorySink};
pub use udp::{GelfUdpSink, SinkConfig};
