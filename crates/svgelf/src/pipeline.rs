use std::io::{BufRead, Write};

use svgelf_decode::LogLine;
use svgelf_event::{EventEnvelope, EventError, EventReader, RawEvent};
use svgelf_sink::{Dispatcher, LogRecord, LogSink};

use crate::error::PipelineError;

/// Counters for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Events read from the supervisor.
    pub events: u64,
    /// Records handed to the sink.
    pub dispatched: u64,
    /// Events dropped because their payload or record was unusable.
    pub skipped: u64,
}

/// Decode one event and dispatch the resulting record.
pub fn process_event<S: LogSink>(
    event: &RawEvent,
    dispatcher: &mut Dispatcher<S>,
) -> Result<LogRecord, PipelineError> {
    let envelope = EventEnvelope::try_from(event)?;
    let line = LogLine::decode(&envelope.data);
    if !line.is_structured() {
        tracing::trace!("log line did not match grammar, using defaults");
    }
    Ok(dispatcher.dispatch(&envelope, line)?)
}

/// Pull events until the supervisor closes the stream.
///
/// A failure confined to one event is logged and the event skipped. Protocol
/// errors end the run, since the channel cannot be resynchronized.
pub fn run_pipeline<R, W, S>(
    reader: &mut EventReader<R, W>,
    dispatcher: &mut Dispatcher<S>,
) -> Result<PipelineStats, EventError>
where
    R: BufRead,
    W: Write,
    S: LogSink,
{
    let mut stats = PipelineStats::default();

    while let Some(event) = reader.next_event()? {
        stats.events += 1;
        match process_event(&event, dispatcher) {
            Ok(_) => stats.dispatched += 1,
            Err(err) => {
                stats.skipped += 1;
                let serial = event.headers.get("serial").unwrap_or("-");
                match &err {
                    PipelineError::Dispatch(sink_err) if !sink_err.is_attribution() => {
                        tracing::error!(serial, error = %err, "record not sent");
                    }
                    _ => {
                        tracing::warn!(serial, error = %err, "event skipped");
                    }
                }
            }
        }
    }

    Ok(stats)
}
