use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Result, SinkError};
use crate::gelf::{check_chunk_size, chunk_message, encode_message, DEFAULT_CHUNK_SIZE};
use crate::hostname::local_hostname;
use crate::record::LogRecord;
use crate::sink::LogSink;

/// Configuration for the GELF UDP sink.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Data bytes per datagram before chunking kicks in. Default: 1420.
    pub chunk_size: usize,
    /// Value for the GELF `host` field. Default: this machine's host name.
    pub source_host: Option<String>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            source_host: None,
        }
    }
}

/// Fire-and-forget GELF sender over UDP.
///
/// Nothing is acknowledged, retried or buffered.
#[derive(Debug)]
pub struct GelfUdpSink {
    socket: UdpSocket,
    target: SocketAddr,
    host: String,
    chunk_size: usize,
    next_message_id: u64,
}

impl GelfUdpSink {
    /// Resolve the aggregator address and open an unconnected UDP socket.
    ///
    /// Fails up front when `config.chunk_size` cannot fit in a datagram.
    pub fn connect(server: &str, port: u16, config: SinkConfig) -> Result<Self> {
        check_chunk_size(config.chunk_size)?;
        let addr = format!("{server}:{port}");
        let target = (server, port)
            .to_socket_addrs()
            .map_err(|source| SinkError::Resolve {
                addr: addr.clone(),
                source,
            })?
            .next()
            .ok_or_else(|| SinkError::Resolve {
                addr: addr.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::AddrNotAvailable,
                    "no addresses returned",
                ),
            })?;

        let bind_addr: SocketAddr = if target.is_ipv4() {
            ([0u8; 4], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(bind_addr)?;

        let host = config.source_host.unwrap_or_else(local_hostname);
        tracing::debug!(%target, %host, chunk_size = config.chunk_size, "GELF sink ready");

        Ok(Self {
            socket,
            target,
            host,
            chunk_size: config.chunk_size,
            next_message_id: seed_message_id(),
        })
    }

    /// Resolved aggregator address.
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Local address of the sending socket.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Value sent in the GELF `host` field.
    pub fn host(&self) -> &str {
        &self.host
    }

    fn message_id(&mut self) -> [u8; 8] {
        let id = self.next_message_id;
        self.next_message_id = self.next_message_id.wrapping_add(1);
        id.to_be_bytes()
    }
}

impl LogSink for GelfUdpSink {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        let message = encode_message(record, &self.host, unix_timestamp())?;
        let id = self.message_id();
        let datagrams = chunk_message(&message, self.chunk_size, id)?;

        for datagram in &datagrams {
            self.socket.send_to(datagram, self.target)?;
        }

        tracing::trace!(
            bytes = message.len(),
            datagrams = datagrams.len(),
            "GELF message sent"
        );
        Ok(())
    }
}

fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

// Chunk ids only need to be distinct among messages in flight to one server.
fn seed_message_id() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    nanos ^ (u64::from(std::process::id()) << 32)
}
