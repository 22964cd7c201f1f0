/// Errors raised while speaking the event listener protocol or splitting payloads.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// A header token did not contain exactly one `:`.
    #[error("malformed header token {token:?} (expected key:value)")]
    MalformedHeader { token: String },

    /// A required header was absent.
    #[error("missing header {0:?}")]
    MissingHeader(&'static str),

    /// A header value could not be parsed into the expected type.
    #[error("invalid value {value:?} for header {name:?}")]
    InvalidHeader { name: &'static str, value: String },

    /// The announced payload length exceeds the configured maximum.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// No newline within the configured header line limit.
    #[error("header line exceeds {max} bytes")]
    HeaderTooLarge { max: usize },

    /// The stream ended before the announced payload was fully read.
    #[error("stream closed after {read} of {expected} payload bytes")]
    ShortPayload { read: usize, expected: usize },

    /// An event payload had no newline between its header line and data.
    #[error("event payload has no header/data separator")]
    MissingEnvelopeSeparator,

    /// The header line was not valid UTF-8.
    #[error("header line is not valid UTF-8")]
    NonUtf8Header,

    /// An I/O error occurred on the protocol streams.
    #[error("protocol I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EventError>;
