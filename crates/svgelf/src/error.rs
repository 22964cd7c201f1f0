use svgelf_event::EventError;
use svgelf_sink::SinkError;

/// Failure to turn one event into a dispatched record.
///
/// These are contained to the offending event; the pipeline moves on.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The payload could not be split into event headers and data.
    #[error("envelope decode failed: {0}")]
    Envelope(#[from] EventError),

    /// The record could not be attributed or sent.
    #[error("dispatch failed: {0}")]
    Dispatch(#[from] SinkError),
}
