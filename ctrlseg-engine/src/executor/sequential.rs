//! Sequential execution strategy

use crate::{
    context::RunContext,
    error::Result,
    executor::{finish_record, ExecutionMode, Executor, Extraction},
};
use ctrlseg_core::{ControlOutcome, LineStore, Profile};
use std::time::Instant;

/// Sequential single-threaded executor
#[derive(Debug, Clone, Default)]
pub struct SequentialExecutor;

impl Executor for SequentialExecutor {
    fn extract(
        &self,
        store: &LineStore,
        profile: &Profile,
        ctx: &mut RunContext,
    ) -> Result<Extraction> {
        let detector = profile.detector();

        let started = Instant::now();
        let candidates = detector.detect(store);
        ctx.candidates = candidates.len();
        ctx.record_stage("detect", started);

        let started = Instant::now();
        let resolved = detector.resolve(store, candidates);
        ctx.record_stage("scan", started);

        let started = Instant::now();
        let assembly = profile.assembler().assemble(store, &resolved);
        ctx.warnings.extend(assembly.warnings);
        ctx.record_stage("assemble", started);

        let started = Instant::now();
        let mut extraction = Extraction::default();
        for outcome in assembly.outcomes {
            match outcome {
                ControlOutcome::Extracted(record) => {
                    let (record, chunks) = finish_record(profile, record);
                    extraction.chunks.extend(chunks);
                    extraction.outcomes.push(ControlOutcome::Extracted(record));
                }
                failed => extraction.outcomes.push(failed),
            }
        }
        ctx.record_stage("score_and_split", started);

        ctx.mode_used = ExecutionMode::Sequential;
        Ok(extraction)
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Sequential
    }
}
