/// Errors that can occur while building or emitting a log record.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// An event header needed to attribute the record was absent.
    #[error("missing {0:?} event header")]
    MissingAttribution(&'static str),

    /// The `pid` event header was not an integer.
    #[error("invalid pid {0:?}")]
    InvalidPid(String),

    /// The encoded record does not fit in the maximum number of GELF chunks.
    #[error("record needs {chunks} chunks (max {max})")]
    TooManyChunks { chunks: usize, max: usize },

    /// The configured chunk size cannot be sent as a UDP datagram.
    #[error("chunk size {size} out of range (1..={max})")]
    InvalidChunkSize { size: usize, max: usize },

    /// The aggregator address did not resolve.
    #[error("failed to resolve {addr}: {source}")]
    Resolve {
        addr: String,
        source: std::io::Error,
    },

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred on the transport socket.
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SinkError {
    /// True for errors caused by the event itself rather than the transport.
    pub fn is_attribution(&self) -> bool {
        matches!(
            self,
            SinkError::MissingAttribution(_) | SinkError::InvalidPid(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SinkError>;
