mod exit;
mod logging;

use std::io;

use clap::builder::RangedU64ValueParser;
use clap::error::ErrorKind;
use clap::Parser;
use svgelf::event::{EventReader, DEFAULT_MAX_HEADER, DEFAULT_MAX_PAYLOAD};
use svgelf::sink::{Dispatcher, GelfUdpSink, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
use svgelf::{run_pipeline, Config};

use crate::exit::{event_error, sink_error, CliResult, SUCCESS, USAGE};
use crate::logging::{init_logging, LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "svgelf",
    version,
    about = "Supervisor event listener forwarding process logs to Graylog (GELF/UDP)"
)]
struct Cli {
    /// Graylog server host name or address.
    #[arg(long, env = "GRAYLOG_SERVER", value_name = "HOST")]
    graylog_server: String,

    /// Graylog GELF UDP input port.
    #[arg(long, env = "GRAYLOG_PORT", value_name = "PORT")]
    graylog_port: u16,

    /// Value for the GELF `host` field (default: this machine's host name).
    #[arg(long, env = "GRAYLOG_SOURCE_HOST", value_name = "NAME")]
    source_host: Option<String>,

    /// Data bytes per UDP datagram before GELF chunking (1..=65495).
    #[arg(
        long,
        value_name = "BYTES",
        default_value_t = DEFAULT_CHUNK_SIZE,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_CHUNK_SIZE as u64)
    )]
    chunk_size: usize,

    /// Largest event payload accepted from the supervisor.
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_PAYLOAD)]
    max_payload: usize,

    /// Longest protocol header line accepted from the supervisor.
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_HEADER)]
    max_header: usize,

    /// Diagnostic format on stderr.
    #[arg(long, env = "SVGELF_LOG_FORMAT", value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Minimum diagnostic level on stderr.
    #[arg(long, env = "SVGELF_LOG_LEVEL", value_name = "LEVEL", default_value = "info")]
    log_level: LogLevel,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            server: self.graylog_server.clone(),
            port: self.graylog_port,
            source_host: self.source_host.clone(),
            chunk_size: self.chunk_size,
            max_payload: self.max_payload,
            max_header: self.max_header,
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            std::process::exit(USAGE);
        }
    };
    init_logging(cli.log_format, cli.log_level);

    match run(cli.config()) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

fn run(config: Config) -> CliResult<i32> {
    tracing::info!(server = %config.server, port = config.port, "starting GELF forwarder");

    let sink = GelfUdpSink::connect(&config.server, config.port, config.sink_config())
        .map_err(|err| sink_error("GELF sink setup failed", err))?;
    let mut dispatcher = Dispatcher::new(sink);

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    let mut reader = EventReader::with_config(stdin, stdout, config.reader_config());

    let stats = run_pipeline(&mut reader, &mut dispatcher)
        .map_err(|err| event_error("event protocol violation", err))?;

    tracing::info!(
        events = stats.events,
        dispatched = stats.dispatched,
        skipped = stats.skipped,
        "event stream closed"
    );
    Ok(SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_server_and_port_flags() {
        let cli = Cli::try_parse_from([
            "svgelf",
            "--graylog-server",
            "graylog.internal",
            "--graylog-port",
            "12201",
        ])
        .expect("flags should parse");

        let config = cli.config();
        assert_eq!(config.server, "graylog.internal");
        assert_eq!(config.port, 12201);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.max_payload, DEFAULT_MAX_PAYLOAD);
        assert_eq!(config.max_header, DEFAULT_MAX_HEADER);
    }

    #[test]
    fn rejects_non_numeric_port() {
        let err = Cli::try_parse_from([
            "svgelf",
            "--graylog-server",
            "graylog.internal",
            "--graylog-port",
            "gelf",
        ])
        .expect_err("port must be numeric");

        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn accepts_logging_options() {
        let cli = Cli::try_parse_from([
            "svgelf",
            "--graylog-server",
            "h",
            "--graylog-port",
            "1",
            "--log-format",
            "json",
            "--log-level",
            "debug",
            "--source-host",
            "app-1",
        ])
        .expect("logging flags should parse");

        assert!(matches!(cli.log_format, LogFormat::Json));
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.config().source_host.as_deref(), Some("app-1"));
    }

    #[test]
    fn log_level_comes_from_environment() {
        std::env::set_var("SVGELF_LOG_LEVEL", "trace");
        let parsed = Cli::try_parse_from(["svgelf", "--graylog-server", "h", "--graylog-port", "1"]);
        std::env::remove_var("SVGELF_LOG_LEVEL");

        assert_eq!(parsed.expect("env level should parse").log_level, LogLevel::Trace);
    }

    #[test]
    fn rejects_chunk_size_outside_datagram_range() {
        for size in ["0", "65496", "100000"] {
            let err = Cli::try_parse_from([
                "svgelf",
                "--graylog-server",
                "h",
                "--graylog-port",
                "1",
                "--chunk-size",
                size,
            ])
            .expect_err("chunk size must fit a datagram");

            assert_eq!(err.kind(), ErrorKind::ValueValidation, "size {size}");
        }
    }

    #[test]
    fn accepts_largest_chunk_size() {
        let cli = Cli::try_parse_from([
            "svgelf",
            "--graylog-server",
            "h",
            "--graylog-port",
            "1",
            "--chunk-size",
            "65495",
        ])
        .expect("largest chunk size should parse");

        assert_eq!(cli.config().chunk_size, MAX_CHUNK_SIZE);
    }
}
