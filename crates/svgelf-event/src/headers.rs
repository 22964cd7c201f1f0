use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{EventError, Result};

/// Header names and values parsed from one `key:value key:value ...` line.
///
/// Used both for protocol headers (`ver`, `server`, `len`, ...) and for the
/// event-level headers at the top of a payload (`processname`, `pid`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: BTreeMap<String, String>,
}

impl HeaderMap {
    /// Parse a whitespace-delimited header line.
    ///
    /// Every token must contain exactly one `:`. A repeated key keeps its last value.
    pub fn parse(line: &str) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for token in line.split_whitespace() {
            let (key, value) = match token.split_once(':') {
                Some((key, value)) if !value.contains(':') => (key, value),
                _ => {
                    return Err(EventError::MalformedHeader {
                        token: token.to_string(),
                    })
                }
            };
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(Self { entries })
    }

    /// Look up a header value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Look up a required header and parse it.
    pub fn parse_value<T: FromStr>(&self, name: &'static str) -> Result<T> {
        let raw = self.get(name).ok_or(EventError::MissingHeader(name))?;
        raw.parse().map_err(|_| EventError::InvalidHeader {
            name,
            value: raw.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for HeaderMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{key}:{value}")?;
            first = false;
        }
        Ok(())
    }
}
