use std::io::{BufRead, ErrorKind, Read, Write};

use bytes::{Bytes, BytesMut};

use crate::error::{EventError, Result};
use crate::headers::HeaderMap;
use crate::protocol::{ACK_OK, DEFAULT_MAX_HEADER, DEFAULT_MAX_PAYLOAD, LEN_HEADER, READY};

const INITIAL_LINE_CAPACITY: usize = 256;

/// One event as delivered by the supervisor: protocol headers plus `len` payload bytes.
#[derive(Debug, Clone)]
pub struct RawEvent {
    /// Protocol-level headers (`ver`, `serial`, `eventname`, `len`, ...).
    pub headers: HeaderMap,
    /// The payload, exactly `len` bytes.
    pub payload: Bytes,
}

/// Configuration for the event reader.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Largest `len` accepted before the stream is treated as corrupt. Default: 16 MiB.
    pub max_payload_size: usize,
    /// Longest header line accepted, newline included. Default: 64 KiB.
    pub max_header_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            max_header_size: DEFAULT_MAX_HEADER,
        }
    }
}

/// Pulls events from a supervisor over an inbound/outbound stream pair.
///
/// Each call to [`EventReader::next_event`] runs one protocol cycle:
/// acknowledge the previous event (if any), announce `READY`, read the header
/// line, then read exactly `len` payload bytes. The acknowledgment for an event
/// is therefore written when the caller comes back for the next one, after it
/// has finished with the current one.
///
/// End of the inbound stream before a header line is a clean stop. Any other
/// failure leaves the channel desynchronized; the reader stops for good.
pub struct EventReader<R, W> {
    input: R,
    output: W,
    config: ReaderConfig,
    pending_ack: bool,
    finished: bool,
    events_read: u64,
}

impl<R: BufRead, W: Write> EventReader<R, W> {
    /// Create a new event reader with default configuration.
    pub fn new(input: R, output: W) -> Self {
        Self::with_config(input, output, ReaderConfig::default())
    }

    /// Create a new event reader with explicit configuration.
    pub fn with_config(input: R, output: W, config: ReaderConfig) -> Self {
        Self {
            input,
            output,
            config,
            pending_ack: false,
            finished: false,
            events_read: 0,
        }
    }

    /// Run one protocol cycle and return the next event (blocking).
    ///
    /// Returns `Ok(None)` once the supervisor closes the inbound stream.
    pub fn next_event(&mut self) -> Result<Option<RawEvent>> {
        if self.finished {
            return Ok(None);
        }

        match self.cycle() {
            Ok(Some(event)) => Ok(Some(event)),
            Ok(None) => {
                self.finished = true;
                tracing::debug!(events = self.events_read, "event stream closed");
                Ok(None)
            }
            Err(err) => {
                self.finished = true;
                Err(err)
            }
        }
    }

    fn cycle(&mut self) -> Result<Option<RawEvent>> {
        if self.pending_ack {
            self.write_token(ACK_OK)?;
            self.pending_ack = false;
        }
        self.write_token(READY)?;

        let max_header = self.config.max_header_size;
        let mut line = Vec::with_capacity(INITIAL_LINE_CAPACITY.min(max_header));
        let limit = u64::try_from(max_header).unwrap_or(u64::MAX).saturating_add(1);
        if (&mut self.input).take(limit).read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        if line.len() > max_header {
            return Err(EventError::HeaderTooLarge { max: max_header });
        }

        let line = std::str::from_utf8(&line).map_err(|_| EventError::NonUtf8Header)?;
        let headers = HeaderMap::parse(line)?;
        let len: usize = headers.parse_value(LEN_HEADER)?;
        if len > self.config.max_payload_size {
            return Err(EventError::PayloadTooLarge {
                size: len,
                max: self.config.max_payload_size,
            });
        }

        let payload = self.read_payload(len)?;
        self.pending_ack = true;
        self.events_read += 1;

        tracing::trace!(
            serial = headers.get("serial").unwrap_or("-"),
            eventname = headers.get("eventname").unwrap_or("-"),
            len,
            "event received"
        );

        Ok(Some(RawEvent { headers, payload }))
    }

    fn read_payload(&mut self, len: usize) -> Result<Bytes> {
        let mut buf = BytesMut::zeroed(len);
        let mut filled = 0usize;
        while filled < len {
            match self.input.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(EventError::ShortPayload {
                        read: filled,
                        expected: len,
                    })
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(EventError::Io(err)),
            }
        }
        Ok(buf.freeze())
    }

    fn write_token(&mut self, token: &[u8]) -> Result<()> {
        self.output.write_all(token)?;
        loop {
            match self.output.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(EventError::Io(err)),
            }
        }
    }

    /// Number of events read so far.
    pub fn events_read(&self) -> u64 {
        self.events_read
    }

    /// Borrow the inbound and outbound streams.
    pub fn get_ref(&self) -> (&R, &W) {
        (&self.input, &self.output)
    }

    /// Mutably borrow the inbound and outbound streams.
    pub fn get_mut(&mut self) -> (&mut R, &mut W) {
        (&mut self.input, &mut self.output)
    }

    /// Consume the reader and return the inbound and outbound streams.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Current reader configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }
}

impl<R: BufRead, W: Write> Iterator for EventReader<R, W> {
    type Item = Result<RawEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event().transpose()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufReader, Cursor, Read};

    use super::*;

    fn wire_event(headers: &str, payload: &str) -> String {
        format!("ver:3.0 {headers} len:{}\n{payload}", payload.len())
    }

    fn reader_over(wire: String) -> EventReader<Cursor<Vec<u8>>, Vec<u8>> {
        EventReader::new(Cursor::new(wire.into_bytes()), Vec::new())
    }

    #[test]
    fn read_single_event() {
        let mut reader = reader_over(wire_event(
            "eventname:PROCESS_LOG_STDOUT",
            "processname:web pid:7\nhello",
        ));

        let event = reader.next_event().unwrap().unwrap();
        assert_eq!(event.headers.get("eventname"), Some("PROCESS_LOG_STDOUT"));
        assert_eq!(event.payload.as_ref(), b"processname:web pid:7\nhello");
        assert_eq!(reader.get_ref().1.as_slice(), READY);
    }

    #[test]
    fn ack_follows_consumption_of_previous_event() {
        let mut reader = reader_over(wire_event("serial:1", "x\n"));

        reader.next_event().unwrap().unwrap();
        assert_eq!(reader.get_ref().1.as_slice(), b"READY\n");

        assert!(reader.next_event().unwrap().is_none());
        assert_eq!(reader.get_ref().1.as_slice(), b"READY\nRESULT 2\nOKREADY\n");
    }

    #[test]
    fn n_events_alternate_ready_and_ack() {
        let count = 5;
        let wire: String = (0..count)
            .map(|i| wire_event(&format!("serial:{i}"), &format!("processname:p pid:{i}\nline {i}")))
            .collect();
        let mut reader = reader_over(wire);

        let mut serials = Vec::new();
        for event in reader.by_ref() {
            let event = event.unwrap();
            serials.push(event.headers.get("serial").unwrap().to_string());
        }

        assert_eq!(serials, ["0", "1", "2", "3", "4"]);
        assert_eq!(reader.events_read(), count);

        let mut expected = Vec::new();
        for _ in 0..count {
            expected.extend_from_slice(READY);
            expected.extend_from_slice(ACK_OK);
        }
        expected.extend_from_slice(READY);
        assert_eq!(reader.get_ref().1, &expected);
    }

    #[test]
    fn empty_stream_is_clean_end() {
        let mut reader = reader_over(String::new());
        assert!(reader.next_event().unwrap().is_none());
        assert!(reader.next_event().unwrap().is_none());
        assert_eq!(reader.get_ref().1.as_slice(), READY);
    }

    #[test]
    fn zero_length_payload() {
        let mut reader = reader_over("ver:3.0 len:0\n".to_string());
        let event = reader.next_event().unwrap().unwrap();
        assert!(event.payload.is_empty());
    }

    #[test]
    fn payload_bytes_are_not_line_delimited() {
        let payload = "a\nb\nc\n";
        let mut wire = wire_event("serial:1", payload);
        wire.push_str(&wire_event("serial:2", "d"));
        let mut reader = reader_over(wire);

        assert_eq!(reader.next_event().unwrap().unwrap().payload.as_ref(), b"a\nb\nc\n");
        assert_eq!(reader.next_event().unwrap().unwrap().payload.as_ref(), b"d");
    }

    #[test]
    fn missing_len_is_fatal() {
        let mut reader = reader_over("ver:3.0 serial:1\n".to_string());
        let err = reader.next_event().unwrap_err();
        assert!(matches!(err, EventError::MissingHeader("len")));
        assert!(reader.next_event().unwrap().is_none());
        assert!(reader.next().is_none());
    }

    #[test]
    fn non_integer_len_is_fatal() {
        let mut reader = reader_over("ver:3.0 len:ten\n".to_string());
        let err = reader.next_event().unwrap_err();
        assert!(matches!(err, EventError::InvalidHeader { name: "len", .. }));
    }

    #[test]
    fn malformed_token_is_fatal() {
        let mut reader = reader_over("ver:3.0 junk len:1\nx".to_string());
        let err = reader.next_event().unwrap_err();
        assert!(matches!(err, EventError::MalformedHeader { .. }));
    }

    #[test]
    fn short_payload_is_fatal() {
        let mut reader = reader_over("ver:3.0 len:10\nabc".to_string());
        let err = reader.next_event().unwrap_err();
        assert!(matches!(
            err,
            EventError::ShortPayload {
                read: 3,
                expected: 10
            }
        ));
    }

    #[test]
    fn oversized_len_is_rejected() {
        let cfg = ReaderConfig {
            max_payload_size: 4,
            ..ReaderConfig::default()
        };
        let mut reader = EventReader::with_config(
            Cursor::new(b"ver:3.0 len:5\nhello".to_vec()),
            Vec::new(),
            cfg,
        );
        let err = reader.next_event().unwrap_err();
        assert!(matches!(err, EventError::PayloadTooLarge { size: 5, max: 4 }));
    }

    #[test]
    fn overlong_header_line_is_rejected() {
        let cfg = ReaderConfig {
            max_header_size: 16,
            ..ReaderConfig::default()
        };
        let wire = format!("ver:3.0 serial:1 {} len:1\nx", "k:v ".repeat(64));
        let mut reader = EventReader::with_config(Cursor::new(wire.into_bytes()), Vec::new(), cfg);

        let err = reader.next_event().unwrap_err();
        assert!(matches!(err, EventError::HeaderTooLarge { max: 16 }));
        assert!(reader.next_event().unwrap().is_none());
    }

    #[test]
    fn header_line_at_limit_is_accepted() {
        let header = "ver:3.0 len:1\n";
        let cfg = ReaderConfig {
            max_header_size: header.len(),
            ..ReaderConfig::default()
        };
        let mut reader =
            EventReader::with_config(Cursor::new(format!("{header}x").into_bytes()), Vec::new(), cfg);

        let event = reader.next_event().unwrap().unwrap();
        assert_eq!(event.payload.as_ref(), b"x");
    }

    #[test]
    fn non_utf8_header_line_is_fatal() {
        let mut reader = EventReader::new(Cursor::new(b"len:\xff\n".to_vec()), Vec::new());
        let err = reader.next_event().unwrap_err();
        assert!(matches!(err, EventError::NonUtf8Header));
    }

    #[test]
    fn partial_reads_are_reassembled() {
        let wire = wire_event("serial:1", "processname:p pid:1\nslow");
        let input = BufReader::with_capacity(
            1,
            ByteByByteReader {
                bytes: wire.into_bytes(),
                pos: 0,
            },
        );
        let mut reader = EventReader::new(input, Vec::new());

        let event = reader.next_event().unwrap().unwrap();
        assert_eq!(event.payload.as_ref(), b"processname:p pid:1\nslow");
    }

    #[test]
    fn interrupted_read_retries() {
        let wire = wire_event("serial:1", "ok");
        let input = BufReader::new(InterruptedThenData {
            state: 0,
            bytes: wire.into_bytes(),
            pos: 0,
        });
        let mut reader = EventReader::new(input, Vec::new());

        let event = reader.next_event().unwrap().unwrap();
        assert_eq!(event.payload.as_ref(), b"ok");
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut reader = reader_over(String::new());
        let _ = reader.get_ref();
        let _ = reader.get_mut();
        assert_eq!(reader.config().max_payload_size, DEFAULT_MAX_PAYLOAD);
        let (_input, output) = reader.into_inner();
        assert!(output.is_empty());
    }

    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct InterruptedThenData {
        state: u8,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.state == 0 {
                self.state = 1;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            let remaining = self.bytes.len() - self.pos;
            let n = remaining.min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }
}
