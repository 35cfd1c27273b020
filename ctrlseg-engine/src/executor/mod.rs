//! Execution strategies for control extraction
//!
//! Both executors run the same stages and produce identical output; they only
//! differ in how the per-candidate and per-control work is scheduled.

use crate::context::RunContext;
use crate::error::Result;
use ctrlseg_core::{Chunk, ControlOutcome, ControlRecord, LineStore, Profile};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
pub mod parallel;
pub mod sequential;

#[cfg(feature = "parallel")]
pub use parallel::ParallelExecutor;
pub use sequential::SequentialExecutor;

/// Execution mode selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Single-threaded sequential processing
    Sequential,
    /// Multi-threaded parallel processing
    Parallel,
    /// Automatically select based on document size
    Adaptive,
}

impl ExecutionMode {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Parallel => "parallel",
            ExecutionMode::Adaptive => "adaptive",
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Controls and chunks of one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// One outcome per identifier, in identifier order
    pub outcomes: Vec<ControlOutcome>,
    /// Chunks of every extracted control, in control order
    pub chunks: Vec<Chunk>,
}

/// Trait for execution strategies
pub trait Executor: Send + Sync {
    /// Run detection, assembly, scoring and chunking over a line store
    fn extract(&self, store: &LineStore, profile: &Profile, ctx: &mut RunContext)
        -> Result<Extraction>;

    /// Get the execution mode
    fn mode(&self) -> ExecutionMode;
}

/// Classify and score an assembled record, then split it
pub(crate) fn finish_record(profile: &Profile, record: ControlRecord) -> (ControlRecord, Vec<Chunk>) {
    let record = profile.scorer().apply(profile.classifier().classify(record));
    let chunks = profile.splitter().split(&record);
    (record, chunks)
}

/// Pick a mode from the number of lines
pub fn auto_select(line_count: usize, threshold: usize) -> ExecutionMode {
    if line_count < threshold {
        ExecutionMode::Sequential
    } else {
        #[cfg(feature = "parallel")]
        return ExecutionMode::Parallel;

        #[cfg(not(feature = "parallel"))]
        ExecutionMode::Sequential
    }
}
