//! Adaptive execution dispatcher
//!
//! Picks sequential or parallel execution from the number of lines in the
//! document. Small documents do not amortize thread start-up.

use crate::{
    config::EngineConfig,
    context::RunContext,
    error::Result,
    executor::{auto_select, ExecutionMode, Executor, Extraction, SequentialExecutor},
};
use ctrlseg_core::{LineStore, Profile};

#[cfg(feature = "parallel")]
use crate::executor::ParallelExecutor;

/// Adaptive execution dispatcher
pub struct AdaptiveDispatcher {
    sequential_executor: SequentialExecutor,
    #[cfg(feature = "parallel")]
    parallel_executor: ParallelExecutor,
    config: EngineConfig,
}

impl AdaptiveDispatcher {
    /// Create a new adaptive dispatcher with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self {
            sequential_executor: SequentialExecutor,
            #[cfg(feature = "parallel")]
            parallel_executor: ParallelExecutor::new(config.threads),
            config,
        }
    }

    /// Engine configuration in use
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Select the execution mode for a document of `line_count` lines
    pub fn select_mode(&self, line_count: usize) -> ExecutionMode {
        if self.config.threads == Some(1) {
            return ExecutionMode::Sequential;
        }
        auto_select(line_count, self.config.parallel_threshold)
    }

    /// Extract with the specified execution mode
    pub fn extract_with_mode(
        &self,
        store: &LineStore,
        profile: &Profile,
        ctx: &mut RunContext,
        mode: ExecutionMode,
    ) -> Result<Extraction> {
        match mode {
            ExecutionMode::Sequential => self.sequential_executor.extract(store, profile, ctx),
            ExecutionMode::Adaptive => {
                let selected = self.select_mode(store.len());
                tracing::debug!(lines = store.len(), mode = %selected, "adaptive mode selected");
                self.extract_with_mode(store, profile, ctx, selected)
            }
            #[cfg(feature = "parallel")]
            ExecutionMode::Parallel => self.parallel_executor.extract(store, profile, ctx),
            #[cfg(not(feature = "parallel"))]
            ExecutionMode::Parallel => {
                tracing::warn!("parallel feature disabled, falling back to sequential");
                self.sequential_executor.extract(store, profile, ctx)
            }
        }
    }
}

impl Executor for AdaptiveDispatcher {
    fn extract(
        &self,
        store: &LineStore,
        profile: &Profile,
        ctx: &mut RunContext,
    ) -> Result<Extraction> {
        self.extract_with_mode(store, profile, ctx, ExecutionMode::Adaptive)
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Adaptive
    }
}
