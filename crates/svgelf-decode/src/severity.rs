/// Two-level classification taken from the leading marker of a log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Severity {
    #[default]
    Debug,
    Error,
}

impl Severity {
    /// `D` is debug; any other marker is an error.
    pub fn from_marker(marker: &str) -> Self {
        if marker == "D" {
            Severity::Debug
        } else {
            Severity::Error
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Error => "ERROR",
        }
    }

    /// Syslog severity number (RFC 5424), as used by GELF's `level` field.
    pub fn syslog_level(self) -> u8 {
        match self {
            Severity::Debug => 7,
            Severity::Error => 3,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
