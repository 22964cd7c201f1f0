use bytes::Bytes;

use crate::error::{EventError, Result};
use crate::headers::HeaderMap;
use crate::reader::RawEvent;

/// An event payload split into its event-level headers and the application data.
///
/// For `PROCESS_LOG_*` events the headers carry `processname`, `groupname`,
/// `pid` and `channel`; the data is whatever the process wrote.
#[derive(Debug, Clone)]
pub struct EventEnvelope {
    pub headers: HeaderMap,
    pub data: Bytes,
}

impl EventEnvelope {
    /// Split a payload at its first newline.
    ///
    /// Everything before the newline is parsed as a header line; everything
    /// after it, including further newlines, is kept as data.
    pub fn parse(payload: &Bytes) -> Result<Self> {
        let split = payload
            .iter()
            .position(|&b| b == b'\n')
            .ok_or(EventError::MissingEnvelopeSeparator)?;

        let line =
            std::str::from_utf8(&payload[..split]).map_err(|_| EventError::NonUtf8Header)?;
        let headers = HeaderMap::parse(line)?;
        let data = payload.slice(split + 1..);

        Ok(Self { headers, data })
    }
}

impl TryFrom<&RawEvent> for EventEnvelope {
    type Error = EventError;

    fn try_from(event: &RawEvent) -> Result<Self> {
        Self::parse(&event.payload)
    }
}
