//! High-level configuration API

use crate::error::{ApiError, Result};
use crate::ControlProcessor;
use ctrlseg_engine::{EngineConfig, ExecutionMode, ExtractorBuilder, DEFAULT_PROFILE};
use std::path::PathBuf;

/// Where the framework profile comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileChoice {
    /// Embedded profile by code
    Embedded(String),
    /// TOML profile file
    File(PathBuf),
}

/// High-level configuration for control extraction
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) profile: ProfileChoice,
    pub(crate) inner: EngineConfig,
    pub(crate) target_tokens: Option<usize>,
    pub(crate) overlap_tokens: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: ProfileChoice::Embedded(DEFAULT_PROFILE.to_string()),
            inner: EngineConfig::default(),
            target_tokens: None,
            overlap_tokens: None,
        }
    }
}

impl Config {
    /// Create a fast configuration
    pub fn fast() -> Self {
        Self {
            inner: EngineConfig::fast(),
            ..Self::default()
        }
    }

    /// Create a balanced configuration
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Create a builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Profile selection
    pub fn profile(&self) -> &ProfileChoice {
        &self.profile
    }

    /// Execution mode
    pub fn execution_mode(&self) -> ExecutionMode {
        self.inner.execution_mode
    }

    pub(crate) fn with_mode(&self, mode: ExecutionMode) -> Self {
        let mut config = self.clone();
        config.inner.execution_mode = mode;
        config
    }

    pub(crate) fn extractor_builder(&self) -> ExtractorBuilder {
        let mut builder = match &self.profile {
            ProfileChoice::Embedded(code) => ExtractorBuilder::new().profile(code.clone()),
            ProfileChoice::File(path) => ExtractorBuilder::new().profile_file(path.clone()),
        }
        .execution_mode(self.inner.execution_mode)
        .threads(self.inner.threads)
        .parallel_threshold(self.inner.parallel_threshold);

        if let Some(target) = self.target_tokens {
            builder = builder.target_tokens(target);
        }
        if let Some(overlap) = self.overlap_tokens {
            builder = builder.overlap_tokens(overlap);
        }
        builder
    }
}

/// Configuration builder
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Use an embedded profile
    pub fn profile(mut self, code: impl Into<String>) -> Self {
        self.config.profile = ProfileChoice::Embedded(code.into());
        self
    }

    /// Use a TOML profile file
    pub fn profile_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.profile = ProfileChoice::File(path.into());
        self
    }

    /// Set execution mode
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.config.inner.execution_mode = mode;
        self
    }

    /// Set thread count
    pub fn threads(mut self, threads: Option<usize>) -> Self {
        self.config.inner.threads = threads;
        self
    }

    /// Set the line count above which adaptive mode goes parallel
    pub fn parallel_threshold(mut self, lines: usize) -> Self {
        self.config.inner.parallel_threshold = lines;
        self
    }

    /// Override the chunk target
    pub fn target_tokens(mut self, tokens: usize) -> Self {
        self.config.target_tokens = Some(tokens);
        self
    }

    /// Override the chunk overlap
    pub fn overlap_tokens(mut self, tokens: usize) -> Self {
        self.config.overlap_tokens = Some(tokens);
        self
    }

    /// Use fast configuration
    pub fn fast(mut self) -> Self {
        self.config.inner = EngineConfig::fast();
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<Config> {
        if let ProfileChoice::Embedded(code) = &self.config.profile {
            if code.trim().is_empty() {
                return Err(ApiError::Config("profile code cannot be empty".to_string()));
            }
        }
        if self.config.target_tokens == Some(0) {
            return Err(ApiError::Config(
                "target tokens must be greater than 0".to_string(),
            ));
        }
        if let (Some(target), Some(overlap)) = (self.config.target_tokens, self.config.overlap_tokens) {
            if overlap >= target {
                return Err(ApiError::Config(
                    "overlap tokens must be less than target tokens".to_string(),
                ));
            }
        }
        if self.config.inner.threads == Some(0) {
            return Err(ApiError::Config("threads must be greater than 0".to_string()));
        }
        Ok(self.config)
    }

    /// Build a processor directly
    pub fn build_processor(self) -> Result<ControlProcessor> {
        ControlProcessor::with_config(self.build()?)
    }
}
