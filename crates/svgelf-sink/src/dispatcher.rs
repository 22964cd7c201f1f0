use svgelf_decode::LogLine;
use svgelf_event::EventEnvelope;

use crate::error::Result;
use crate::record::LogRecord;
use crate::sink::LogSink;

/// Builds one record per event and emits it, in arrival order.
pub struct Dispatcher<S> {
    sink: S,
    dispatched: u64,
}

impl<S: LogSink> Dispatcher<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            dispatched: 0,
        }
    }

    /// Attribute `line` to the process in `envelope` and emit it once.
    ///
    /// Nothing is emitted when attribution fails.
    pub fn dispatch(&mut self, envelope: &EventEnvelope, line: LogLine) -> Result<LogRecord> {
        let record = LogRecord::from_envelope(envelope, line)?;
        self.sink.emit(&record)?;
        self.dispatched += 1;

        tracing::trace!(
            logger = %record.logger_name,
            pid = record.process_id,
            severity = %record.severity,
            "record dispatched"
        );

        Ok(record)
    }

    /// Number of records successfully emitted.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}
