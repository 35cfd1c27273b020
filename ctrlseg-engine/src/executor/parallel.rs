//! Parallel execution strategy
//!
//! Candidate detection, backward scans and per-control work fan out over
//! rayon. Span resolution needs every scan result at once and stays on the
//! calling thread. Indexed collects keep the output identical to the
//! sequential executor.

use crate::{
    context::RunContext,
    error::{EngineError, Result},
    executor::{finish_record, ExecutionMode, Executor, Extraction},
};
use ctrlseg_core::{
    resolve_spans, BoundaryCandidate, ControlAssembler, ControlOutcome, LineStore, Profile,
    ScanOutcome,
};
use rayon::prelude::*;
use std::time::Instant;

/// Parallel multi-threaded executor
#[derive(Debug, Clone, Default)]
pub struct ParallelExecutor {
    threads: Option<usize>,
}

impl ParallelExecutor {
    /// Create a new parallel executor; `None` uses the global rayon pool
    pub fn new(threads: Option<usize>) -> Self {
        Self { threads }
    }

    fn run(&self, store: &LineStore, profile: &Profile, ctx: &mut RunContext) -> Extraction {
        let detector = profile.detector();

        let started = Instant::now();
        let candidates: Vec<BoundaryCandidate> = store
            .lines()
            .par_iter()
            .filter_map(|line| detector.detect_line(line))
            .collect();
        ctx.candidates = candidates.len();
        ctx.record_stage("detect", started);

        let started = Instant::now();
        let outcomes: Vec<ScanOutcome> = candidates
            .par_iter()
            .map(|candidate| detector.scan_back(store, candidate))
            .collect();
        let resolved = resolve_spans(store.len(), candidates, outcomes);
        ctx.record_stage("scan", started);

        let started = Instant::now();
        let assembler = profile.assembler();
        let groups: Vec<_> = ControlAssembler::group(&resolved).into_iter().collect();
        let results: Vec<_> = groups
            .into_par_iter()
            .map(|(identifier, spans)| {
                let assembled = assembler.assemble_one(store, identifier, spans);
                match assembled.outcome {
                    ControlOutcome::Extracted(record) => {
                        let (record, chunks) = finish_record(profile, record);
                        (ControlOutcome::Extracted(record), assembled.warnings, chunks)
                    }
                    failed => (failed, assembled.warnings, Vec::new()),
                }
            })
            .collect();
        ctx.record_stage("assemble_score_split", started);

        let mut extraction = Extraction::default();
        for (outcome, warnings, chunks) in results {
            extraction.outcomes.push(outcome);
            extraction.chunks.extend(chunks);
            ctx.warnings.extend(warnings);
        }
        extraction
    }
}

impl Executor for ParallelExecutor {
    fn extract(
        &self,
        store: &LineStore,
        profile: &Profile,
        ctx: &mut RunContext,
    ) -> Result<Extraction> {
        let extraction = match self.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| EngineError::ParallelError(e.to_string()))?;
                pool.install(|| self.run(store, profile, ctx))
            }
            None => self.run(store, profile, ctx),
        };
        ctx.mode_used = ExecutionMode::Parallel;
        Ok(extraction)
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Parallel
    }
}
