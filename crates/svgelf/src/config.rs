use svgelf_event::{ReaderConfig, DEFAULT_MAX_HEADER, DEFAULT_MAX_PAYLOAD};
use svgelf_sink::{SinkConfig, DEFAULT_CHUNK_SIZE};

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Graylog host name or address.
    pub server: String,
    /// Graylog GELF UDP input port.
    pub port: u16,
    /// Override for the GELF `host` field.
    pub source_host: Option<String>,
    /// Data bytes per datagram before GELF chunking.
    pub chunk_size: usize,
    /// Largest event payload accepted from the supervisor.
    pub max_payload: usize,
    /// Longest protocol header line accepted from the supervisor.
    pub max_header: usize,
}

impl Config {
    pub fn new(server: impl Into<String>, port: u16) -> Self {
        Self {
            server: server.into(),
            port,
            source_host: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_payload: DEFAULT_MAX_PAYLOAD,
            max_header: DEFAULT_MAX_HEADER,
        }
    }

    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig {
            max_payload_size: self.max_payload,
            max_header_size: self.max_header,
        }
    }

    pub fn sink_config(&self) -> SinkConfig {
        SinkConfig {
            chunk_size: self.chunk_size,
            source_host: self.source_host.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_layer_configs() {
        let mut config = Config::new("graylog.internal", 12201);
        config.source_host = Some("app-1".to_string());
        config.max_payload = 1024;

        let reader = config.reader_config();
        assert_eq!(reader.max_payload_size, 1024);
        assert_eq!(reader.max_header_size, DEFAULT_MAX_HEADER);
        let sink = config.sink_config();
        assert_eq!(sink.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(sink.source_host.as_deref(), Some("app-1"));
    }
}
