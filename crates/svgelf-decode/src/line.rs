use std::sync::LazyLock;

use regex::Regex;

use crate::severity::Severity;

/// Marker, then anything, then ` file.go:line: message`.
///
/// Groups: 1 marker, 2 file name, 3 line number, 4 message.
static LINE_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(D|E).* (\w+\.go):([0-9]{1,5}): (.*)").expect("log line grammar must compile")
});

/// Fields recovered from one chunk of application output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub severity: Severity,
    /// Source file name, empty when unknown.
    pub source_file: String,
    /// Source line number, 0 when unknown.
    pub source_line: u32,
    pub message: String,
    structured: bool,
}

impl LogLine {
    /// Decode application output.
    ///
    /// Only the first line is matched against the grammar. Each field falls
    /// back independently when its group is absent: severity to
    /// [`Severity::Debug`], file to `""`, line to `0`, and message to the whole
    /// data unmodified. Invalid UTF-8 is replaced, never rejected.
    pub fn decode(data: &[u8]) -> Self {
        let text = String::from_utf8_lossy(data);
        let first_line = text.lines().next().unwrap_or_default();
        let captures = LINE_GRAMMAR.captures(first_line);
        let group = |index: usize| {
            captures
                .as_ref()
                .and_then(|c| c.get(index))
                .map(|m| m.as_str())
        };

        let severity = group(1).map(Severity::from_marker).unwrap_or_default();
        let source_file = group(2).unwrap_or_default().to_string();
        let source_line = group(3).and_then(|n| n.parse().ok()).unwrap_or(0);
        let message = match group(4) {
            Some(body) => body.to_string(),
            None => text.to_string(),
        };

        Self {
            severity,
            source_file,
            source_line,
            message,
            structured: captures.is_some(),
        }
    }

    /// True when the line followed the `file.go:line:` grammar.
    pub fn is_structured(&self) -> bool {
        self.structured
    }
}
