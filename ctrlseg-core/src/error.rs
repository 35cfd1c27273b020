//! Core error types
//!
//! Only configuration problems are errors at this layer. Problems that affect a
//! single control are reported as warnings or failed outcomes, never as `Err`.

use thiserror::Error;

/// Domain-level errors
#[derive(Debug, Error)]
pub enum CoreError {
    /// A configured regular expression failed to compile
    #[error("invalid pattern for {name}: {source}")]
    InvalidPattern {
        /// Which configuration entry holds the pattern
        name: String,
        /// The underlying regex error
        #[source]
        source: regex::Error,
    },

    /// Configuration values are out of range or inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Profile file could not be read or parsed
    #[error("Configuration error: {0}")]
    ProfileParse(String),

    /// Unknown embedded profile requested
    #[error("Unknown profile: {0}")]
    UnknownProfile(String),
}

impl CoreError {
    pub(crate) fn pattern(name: impl Into<String>, source: regex::Error) -> Self {
        CoreError::InvalidPattern {
            name: name.into(),
            source,
        }
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pattern_display_names_the_entry() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = CoreError::pattern("identifier.pattern", source);
        assert!(err.to_string().starts_with("invalid pattern for identifier.pattern"));
    }

    #[test]
    fn test_unknown_profile_display() {
        let err = CoreError::UnknownProfile("nist".to_string());
        assert_eq!(err.to_string(), "Unknown profile: nist");
    }
}
