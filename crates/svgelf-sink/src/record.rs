use svgelf_decode::{LogLine, Severity};
use svgelf_event::EventEnvelope;

use crate::error::{Result, SinkError};

const PROCESS_NAME_HEADER: &str = "processname";
const PID_HEADER: &str = "pid";

/// One structured record, ready for a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Name of the supervised process that wrote the line.
    pub logger_name: String,
    pub severity: Severity,
    /// Empty when the line carried no source location.
    pub source_file: String,
    /// 0 when the line carried no source location.
    pub source_line: u32,
    pub message: String,
    pub process_id: u32,
}

impl LogRecord {
    /// Attribute a decoded line to the process named in the event headers.
    ///
    /// The `pid` header must be an integer; it is never defaulted.
    pub fn from_envelope(envelope: &EventEnvelope, line: LogLine) -> Result<Self> {
        let logger_name = envelope
            .headers
            .get(PROCESS_NAME_HEADER)
            .ok_or(SinkError::MissingAttribution(PROCESS_NAME_HEADER))?
            .to_string();

        let pid = envelope
            .headers
            .get(PID_HEADER)
            .ok_or(SinkError::MissingAttribution(PID_HEADER))?;
        let process_id = pid
            .parse()
            .map_err(|_| SinkError::InvalidPid(pid.to_string()))?;

        Ok(Self {
            logger_name,
            severity: line.severity,
            source_file: line.source_file,
            source_line: line.source_line,
            message: line.message,
            process_id,
        })
    }
}
