//! Supervisor event listener protocol.
//!
//! A listener process talks to the supervisor over its own stdin/stdout:
//! - The listener announces `READY\n`
//! - The supervisor sends one header line (`key:value` tokens, including `len`)
//! - The supervisor sends exactly `len` payload bytes
//! - The listener acknowledges with `RESULT 2\nOK` before announcing again
//!
//! [`EventReader`] drives that cycle and yields one [`RawEvent`] per event.

pub mod envelope;
pub mod error;
pub mod headers;
pub mod protocol;
pub mod reader;

pub use envelope::EventEnvelope;
pub use error::{EventError, Result};
pub use headers::HeaderMap;
pub use protocol::{ACK_OK, DEFAULT_MAX_HEADER, DEFAULT_MAX_PAYLOAD, LEN_HEADER, READY};
pub use reader::{EventReader, RawEvent, ReaderConfig};
