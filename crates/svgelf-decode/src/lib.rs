//! Log-line decoding.
//!
//! Recovers severity, source location and message body from lines such as
//! `D2018/02/15 10:31:07 orders.go:168: order callback was finished`.
//! Lines that do not follow that shape still decode, with per-field defaults.

pub mod line;
pub mod severity;

pub use line::LogLine;
pub use severity::Severity;
