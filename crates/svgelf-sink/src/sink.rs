use crate::error::Result;
use crate::record::LogRecord;

/// Destination for log records.
pub trait LogSink {
    /// Send one record. Called exactly once per dispatched event.
    fn emit(&mut self, record: &LogRecord) -> Result<()>;
}

impl<S: LogSink + ?Sized> LogSink for &mut S {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        (**self).emit(record)
    }
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        (**self).emit(record)
    }
}

/// Keeps every emitted record in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<LogRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<LogRecord> {
        self.records
    }
}

impl LogSink for MemorySink {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}
