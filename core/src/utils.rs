//! Utility functions and types.

use std::fmt;

/// Redact wraps a secret so that `Debug` and `Display` never print it in full.
///
/// Values shorter than 12 bytes are fully masked. Longer values keep their
/// first and last three characters so two redacted keys can still be told
/// apart in logs.
#[derive(Clone, Copy)]
pub struct Redact<'a>(Option<&'a str>);

impl<'a> Redact<'a> {
    const VISIBLE: usize = 3;
    const MIN_LEN: usize = 12;

    fn write(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = match self.0 {
            None | Some("") => return f.write_str("EMPTY"),
            Some(v) => v,
        };

        let (head, tail) = (
            v.get(..Self::VISIBLE),
            v.get(v.len().saturating_sub(Self::VISIBLE)..),
        );
        match (head, tail) {
            (Some(head), Some(tail)) if v.len() >= Self::MIN_LEN => {
                write!(f, "{head}***{tail}")
            }
            _ => f.write_str("***"),
        }
    }
}

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(Some(value))
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(Some(value.as_str()))
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref())
    }
}

impl fmt::Debug for Redact<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f)
    }
}

impl fmt::Display for Redact<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f)
    }
}
