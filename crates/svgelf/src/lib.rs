//! Supervisor event listener that forwards process output to Graylog.
//!
//! svgelf runs as a supervisor `[eventlistener:x]` subscribed to
//! `PROCESS_LOG` events, decodes each logged line and sends it on as a GELF
//! record over UDP.
//!
//! # Crate Structure
//!
//! - [`event`] — Listener protocol handshake, event framing, payload envelopes
//! - [`decode`] — Severity, source location and message extraction
//! - [`sink`] — Log records, dispatch, GELF over UDP
//! - [`pipeline`] — The read/decode/dispatch loop tying them together

pub mod config;
pub mod error;
pub mod pipeline;

/// Re-export event protocol types.
pub mod event {
    pub use svgelf_event::*;
}

/// Re-export log-line decoding types.
pub mod decode {
    pub use svgelf_decode::*;
}

/// Re-export sink and dispatch types.
pub mod sink {
    pub use svgelf_sink::*;
}

pub use config::Config;
pub use error::PipelineError;
pub use pipeline::{process_event, run_pipeline, PipelineStats};
