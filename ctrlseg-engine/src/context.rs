//! Per-run state
//!
//! A [`RunContext`] is created at the start of a run, threaded through every
//! stage by mutable reference and turned into the validation report at the
//! end. Nothing outlives the run.

use crate::executor::ExecutionMode;
use ctrlseg_core::IntegrityWarning;
use std::time::{Duration, Instant};

/// Counters, warnings and timings collected during one run
#[derive(Debug)]
pub struct RunContext {
    /// Profile code the run uses
    pub profile: String,
    /// Lines that survived normalization
    pub lines: usize,
    /// Boundary candidates found
    pub candidates: usize,
    /// Integrity warnings from assembly
    pub warnings: Vec<IntegrityWarning>,
    /// Mode the executor actually used
    pub mode_used: ExecutionMode,
    /// Wall time per stage, in execution order
    pub stage_timings: Vec<(&'static str, Duration)>,
    started: Instant,
}

impl RunContext {
    /// Start a run
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            lines: 0,
            candidates: 0,
            warnings: Vec::new(),
            mode_used: ExecutionMode::Sequential,
            stage_timings: Vec::new(),
            started: Instant::now(),
        }
    }

    /// Record the time spent in a stage that began at `since`
    pub fn record_stage(&mut self, stage: &'static str, since: Instant) {
        let elapsed = since.elapsed();
        tracing::debug!(stage, elapsed_ms = elapsed.as_secs_f64() * 1000.0, "stage finished");
        self.stage_timings.push((stage, elapsed));
    }

    /// Time since the run started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
