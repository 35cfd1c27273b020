//! Public API for ctrlseg compliance control extraction
//!
//! This crate provides a stable interface over the engine: inputs in,
//! serializable per-control and per-chunk artifacts plus a validation report
//! out. Engine and core types stay behind the DTOs in [`dto`].

#![warn(missing_docs)]

pub mod config;
pub mod dto;
pub mod error;

use ctrlseg_core::ControlOutcome;
use error::Result;
use std::collections::HashMap;
use std::sync::Arc;

// Re-export key types
pub use config::{Config, ConfigBuilder, ProfileChoice};
pub use ctrlseg_core::MappingTuple;
pub use ctrlseg_engine::{ExecutionMode, RunStatus, ValidationReport};
pub use dto::{
    reconcile, ChunkArtifact, ChunkMetadata, ControlArtifact, FailureDTO, Input,
    MappingReconciliation, Output,
};
pub use error::ApiError;

/// Main entry point for control extraction
pub struct ControlProcessor {
    inner: Arc<ctrlseg_engine::ControlExtractor>,
    config: Config,
}

impl std::fmt::Debug for ControlProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlProcessor")
            .field("profile", &self.profile_code())
            .field("execution_mode", &self.config.execution_mode())
            .finish()
    }
}

impl ControlProcessor {
    /// Create a processor with the default profile and adaptive execution
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Create a processor for an embedded profile
    pub fn with_profile(code: &str) -> Result<Self> {
        Self::with_config(Config::builder().profile(code).build()?)
    }

    /// Create a processor with custom configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let inner = config.extractor_builder().build()?;
        Ok(Self {
            inner: Arc::new(inner),
            config,
        })
    }

    /// Process input and return artifacts
    pub fn process(&self, input: Input) -> Result<Output> {
        let output = self.inner.process(input.into_engine())?;
        Ok(convert(output))
    }

    /// Process with explicit execution mode
    pub fn process_with_mode(&self, input: Input, mode: ExecutionMode) -> Result<Output> {
        let processor = Self::with_config(self.config.with_mode(mode))?;
        processor.process(input)
    }

    /// Process text directly (convenience method)
    pub fn process_text(&self, text: &str) -> Result<Output> {
        self.process(Input::from_text(text))
    }

    /// Get the current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Code of the profile in use
    pub fn profile_code(&self) -> &str {
        self.inner.profile().code()
    }
}

fn convert(output: ctrlseg_engine::Output) -> Output {
    let mut controls = Vec::new();
    let mut failures = Vec::new();
    let mut scores = HashMap::new();

    for outcome in &output.controls {
        match outcome {
            ControlOutcome::Extracted(record) => {
                scores.insert(record.identifier.clone(), record.score());
                controls.push(ControlArtifact::from(record));
            }
            ControlOutcome::Failed { identifier, reason } => failures.push(FailureDTO {
                identifier: identifier.to_string(),
                reason: reason.clone(),
            }),
        }
    }

    let chunks = output
        .chunks
        .iter()
        .map(|chunk| {
            let score = scores.get(&chunk.control_id).copied().unwrap_or(0.0);
            ChunkArtifact::new(chunk, score)
        })
        .collect();

    Output {
        controls,
        failures,
        chunks,
        report: output.report,
    }
}

// Convenience functions

/// Process text with the default profile
pub fn process_text(text: &str) -> Result<Output> {
    ControlProcessor::new()?.process(Input::from_text(text))
}

/// Process a file with the default profile
pub fn process_file<P: AsRef<std::path::Path>>(path: P) -> Result<Output> {
    ControlProcessor::new()?.process(Input::from_file(path.as_ref().to_path_buf()))
}

/// Process text with an embedded profile
pub fn process_text_with_profile(text: &str, profile: &str) -> Result<Output> {
    ControlProcessor::with_profile(profile)?.process(Input::from_text(text))
}

/// Codes of the embedded profiles
pub fn available_profiles() -> Vec<&'static str> {
    ctrlseg_core::profile::list_available_profiles()
}
