//! Hierarchical control identifiers such as `1.2.8` or `A1.2.3`

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A dotted identifier with an optional alphabetic prefix
///
/// Equality and hashing use the raw text. Ordering is segment-wise numeric,
/// so `1.2.9 < 1.2.10`.
#[derive(Debug, Clone)]
pub struct ControlId {
    raw: String,
    prefix: String,
    segments: SmallVec<[u32; 4]>,
}

/// Error returned when a string is not a dotted identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseControlIdError(pub String);

impl fmt::Display for ParseControlIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a hierarchical identifier: {:?}", self.0)
    }
}

impl std::error::Error for ParseControlIdError {}

impl ControlId {
    /// Parse an identifier like `A1.2.3`
    ///
    /// The prefix is any run of leading ASCII letters. At least two numeric
    /// segments are required.
    pub fn parse(raw: &str) -> Result<Self, ParseControlIdError> {
        let trimmed = raw.trim();
        let digits_at = trimmed
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(trimmed.len());
        let (prefix, rest) = trimmed.split_at(digits_at);

        let mut segments = SmallVec::new();
        for part in rest.split('.') {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseControlIdError(raw.to_string()));
            }
            let value = part
                .parse::<u32>()
                .map_err(|_| ParseControlIdError(raw.to_string()))?;
            segments.push(value);
        }

        if segments.len() < 2 {
            return Err(ParseControlIdError(raw.to_string()));
        }

        Ok(Self {
            raw: trimmed.to_string(),
            prefix: prefix.to_string(),
            segments,
        })
    }

    /// The identifier as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Alphabetic prefix, empty when absent
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl PartialEq for ControlId {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for ControlId {}

impl std::hash::Hash for ControlId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl Ord for ControlId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.prefix
            .cmp(&other.prefix)
            .then_with(|| self.segments.cmp(&other.segments))
            // distinct spellings of the same numbers, e.g. `1.02` and `1.2`
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for ControlId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ControlId {
    type Err = ParseControlIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ControlId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ControlId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ControlId::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ControlId {
        ControlId::parse(s).unwrap()
    }

    #[test]
    fn test_numeric_ordering() {
        assert!(id("1.2.9") < id("1.2.10"));
        assert!(id("2.1") > id("1.12.4"));
        assert!(id("1.2") < id("1.2.1"));
    }

    #[test]
    fn test_prefixed_identifiers_sort_after_plain() {
        assert_eq!(id("A1.2.3").prefix(), "A");
        assert!(id("12.10.7") < id("A1.1.1"));
    }

    #[test]
    fn test_rejects_non_hierarchical() {
        assert!(ControlId::parse("12").is_err());
        assert!(ControlId::parse("1..2").is_err());
        assert!(ControlId::parse("1.2.a").is_err());
        assert!(ControlId::parse("").is_err());
    }
}
