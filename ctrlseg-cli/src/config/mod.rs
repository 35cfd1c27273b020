//! CLI configuration file

use crate::error::CliError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct CliConfig {
    /// Processing configuration
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Performance configuration
    #[serde(default)]
    pub performance: PerformanceConfig,
}

/// Processing-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct ProcessingConfig {
    /// Embedded profile used when none is given on the command line
    pub default_profile: String,

    /// Profile file, takes precedence over `default_profile`
    #[serde(default)]
    pub profile_file: Option<PathBuf>,

    /// Chunk target override
    #[serde(default)]
    pub target_tokens: Option<usize>,

    /// Chunk overlap override
    #[serde(default)]
    pub overlap_tokens: Option<usize>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            default_profile: "pci-dss".to_string(),
            profile_file: None,
            target_tokens: None,
            overlap_tokens: None,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct OutputConfig {
    /// Pretty print JSON output
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty_json: true }
    }
}

/// Performance-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct PerformanceConfig {
    /// Line count above which adaptive mode goes parallel
    pub parallel_threshold_lines: usize,

    /// Number of worker threads (0 = auto)
    pub worker_threads: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            parallel_threshold_lines: 5_000,
            worker_threads: 0,
        }
    }
}

impl CliConfig {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::ConfigError(format!("{}: {e}", path.display())))?;
        let config = toml::from_str(&content)
            .map_err(|e| CliError::ConfigError(format!("{}: {e}", path.display())))?;
        Ok(config)
    }

    /// Worker threads, `None` for automatic
    pub fn threads(&self) -> Option<usize> {
        match self.performance.worker_threads {
            0 => None,
            n => Some(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "[processing]\ndefault_profile = \"generic\"\ntarget_tokens = 200\n\n[performance]\nparallel_threshold_lines = 100\nworker_threads = 2\n"
        )
        .unwrap();

        let config = CliConfig::load(file.path()).unwrap();
        assert_eq!(config.processing.default_profile, "generic");
        assert_eq!(config.processing.target_tokens, Some(200));
        assert_eq!(config.threads(), Some(2));
        assert!(config.output.pretty_json);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[processing\n").unwrap();
        let err = CliConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn test_default_threads_auto() {
        assert_eq!(CliConfig::default().threads(), None);
    }
}
