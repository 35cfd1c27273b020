//! Control extractor and builder
//!
//! [`ControlExtractor`] is the entry point of the engine: input in, controls,
//! chunks and a validation report out.

use crate::{
    adaptive_dispatcher::AdaptiveDispatcher,
    config::EngineConfig,
    context::RunContext,
    error::{EngineError, Result},
    executor::ExecutionMode,
    input::Input,
    report::ValidationReport,
};
use ctrlseg_core::{Chunk, ControlId, ControlOutcome, ControlRecord, LineStore, Profile, DEFAULT_PROFILE};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Result of one extraction run
#[derive(Debug, Clone)]
pub struct Output {
    /// One outcome per identifier, in identifier order
    pub controls: Vec<ControlOutcome>,
    /// Chunks of all extracted controls, in control order
    pub chunks: Vec<Chunk>,
    /// Run-level summary
    pub report: ValidationReport,
}

impl Output {
    /// Extracted records, skipping failures
    pub fn records(&self) -> impl Iterator<Item = &ControlRecord> {
        self.controls.iter().filter_map(ControlOutcome::record)
    }

    /// Record of one identifier
    pub fn record(&self, identifier: &str) -> Option<&ControlRecord> {
        let identifier: ControlId = identifier.parse().ok()?;
        self.records().find(|r| r.identifier == identifier)
    }

    /// Chunks of one identifier, in sequence order
    pub fn chunks_for<'a>(&'a self, identifier: &'a ControlId) -> impl Iterator<Item = &'a Chunk> {
        self.chunks.iter().filter(move |c| &c.control_id == identifier)
    }
}

/// Extracts controls from documents with one profile
#[derive(Clone)]
pub struct ControlExtractor {
    profile: Arc<Profile>,
    dispatcher: Arc<AdaptiveDispatcher>,
}

impl std::fmt::Debug for ControlExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlExtractor")
            .field("profile", &self.profile.code())
            .field("config", self.dispatcher.config())
            .finish()
    }
}

impl ControlExtractor {
    /// Extractor with the default profile and engine configuration
    pub fn new() -> Result<Self> {
        Ok(Self::with_profile(Profile::from_code(DEFAULT_PROFILE)?))
    }

    /// Extractor for an embedded profile
    pub fn for_profile(code: &str) -> Result<Self> {
        Ok(Self::with_profile(Profile::from_code(code)?))
    }

    /// Extractor with a compiled profile and the default engine configuration
    pub fn with_profile(profile: Profile) -> Self {
        Self::with_config(profile, EngineConfig::default())
    }

    /// Extractor with a compiled profile and engine configuration
    pub fn with_config(profile: Profile, config: EngineConfig) -> Self {
        Self {
            profile: Arc::new(profile),
            dispatcher: Arc::new(AdaptiveDispatcher::new(config)),
        }
    }

    /// Profile in use
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Engine configuration in use
    pub fn config(&self) -> &EngineConfig {
        self.dispatcher.config()
    }

    /// Process input with the configured execution mode
    pub fn process(&self, input: Input) -> Result<Output> {
        self.run(input, self.config().execution_mode)
    }

    /// Process input with a specific execution mode
    pub fn process_with_mode(&self, input: Input, mode: ExecutionMode) -> Result<Output> {
        self.run(input, mode)
    }

    /// Process text directly (convenience method)
    pub fn process_text(&self, text: &str) -> Result<Output> {
        self.process(Input::from_text(text.to_string()))
    }

    fn run(&self, input: Input, mode: ExecutionMode) -> Result<Output> {
        let mut ctx = RunContext::new(self.profile.code());

        let started = Instant::now();
        tracing::debug!(
            profile = %self.profile.code(),
            bytes = ?input.estimated_size(),
            "ingesting input"
        );
        let store = LineStore::ingest(input.into_blocks()?);
        ctx.lines = store.len();
        ctx.record_stage("ingest", started);

        if store.is_empty() {
            tracing::warn!(profile = %self.profile.code(), "input contained no lines");
            return Ok(Output {
                controls: Vec::new(),
                chunks: Vec::new(),
                report: ValidationReport::empty(&self.profile, ctx),
            });
        }

        let extraction = self
            .dispatcher
            .extract_with_mode(&store, &self.profile, &mut ctx, mode)?;
        let report = ValidationReport::build(&self.profile, ctx, &extraction);

        Ok(Output {
            controls: extraction.outcomes,
            chunks: extraction.chunks,
            report,
        })
    }
}

enum ProfileSource {
    Code(String),
    Compiled(Profile),
    File(PathBuf),
}

/// Builder for [`ControlExtractor`]
pub struct ExtractorBuilder {
    profile: ProfileSource,
    engine: EngineConfig,
    target_tokens: Option<usize>,
    overlap_tokens: Option<usize>,
}

impl Default for ExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            profile: ProfileSource::Code(DEFAULT_PROFILE.to_string()),
            engine: EngineConfig::default(),
            target_tokens: None,
            overlap_tokens: None,
        }
    }

    /// Use an embedded profile
    pub fn profile<S: Into<String>>(mut self, code: S) -> Self {
        self.profile = ProfileSource::Code(code.into());
        self
    }

    /// Use an already compiled profile
    pub fn compiled_profile(mut self, profile: Profile) -> Self {
        self.profile = ProfileSource::Compiled(profile);
        self
    }

    /// Load the profile from a TOML file at build time
    pub fn profile_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.profile = ProfileSource::File(path.into());
        self
    }

    /// Set the execution mode
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.engine.execution_mode = mode;
        self
    }

    /// Set the thread count
    pub fn threads(mut self, count: Option<usize>) -> Self {
        self.engine.threads = count;
        self
    }

    /// Set the line count above which adaptive mode goes parallel
    pub fn parallel_threshold(mut self, lines: usize) -> Self {
        self.engine.parallel_threshold = lines;
        self
    }

    /// Override the profile's chunk target
    pub fn target_tokens(mut self, tokens: usize) -> Self {
        self.target_tokens = Some(tokens);
        self
    }

    /// Override the profile's chunk overlap
    pub fn overlap_tokens(mut self, tokens: usize) -> Self {
        self.overlap_tokens = Some(tokens);
        self
    }

    /// Use the sequential preset
    pub fn sequential(mut self) -> Self {
        self.engine = EngineConfig::sequential();
        self
    }

    /// Use the fast preset
    pub fn fast(mut self) -> Self {
        self.engine = EngineConfig::fast();
        self
    }

    /// Use the balanced preset
    pub fn balanced(mut self) -> Self {
        self.engine = EngineConfig::balanced();
        self
    }

    /// Build the extractor
    pub fn build(self) -> Result<ControlExtractor> {
        if self.engine.threads == Some(0) {
            return Err(EngineError::ConfigError(
                "Thread count must be greater than 0".to_string(),
            ));
        }

        let mut profile = match self.profile {
            ProfileSource::Code(code) => Profile::from_code(&code)?,
            ProfileSource::Compiled(profile) => profile,
            ProfileSource::File(path) => Profile::from_file(path)?,
        };

        if self.target_tokens.is_some() || self.overlap_tokens.is_some() {
            let chunking = &profile.config().chunking;
            let target = self.target_tokens.unwrap_or(chunking.target_tokens);
            let overlap = self.overlap_tokens.unwrap_or(chunking.overlap_tokens);
            profile = profile.with_chunking(target, overlap)?;
        }

        Ok(ControlExtractor::with_config(profile, self.engine))
    }
}
