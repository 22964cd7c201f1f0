//! Literal protocol tokens.

/// Written at the top of every cycle, before the supervisor sends an event.
pub const READY: &[u8] = b"READY\n";

/// Written once per consumed event, after it has been read in full.
pub const ACK_OK: &[u8] = b"RESULT 2\nOK";

/// Header carrying the payload byte count.
pub const LEN_HEADER: &str = "len";

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Default maximum header line length, newline included: 64 KiB.
pub const DEFAULT_MAX_HEADER: usize = 64 * 1024;
