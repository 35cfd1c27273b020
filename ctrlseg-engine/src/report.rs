//! Validation report
//!
//! The run-level summary users see instead of internal errors: counts,
//! quality distribution, per-control failures and concrete recommendations.

use crate::context::RunContext;
use crate::executor::{ExecutionMode, Extraction};
use ctrlseg_core::{ControlId, ControlOutcome, IntegrityWarning, Profile, QualityGrade};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Overall verdict of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Enough controls, none failed, all at or above the pass threshold
    Passed,
    /// Output produced but incomplete or low quality somewhere
    Degraded,
    /// Nothing usable was extracted
    Failed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunStatus::Passed => "passed",
            RunStatus::Degraded => "degraded",
            RunStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A control that could not be assembled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedControl {
    /// Identifier of the control
    pub identifier: ControlId,
    /// Why assembly failed
    pub reason: String,
}

/// Summary of one extraction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Profile code
    pub profile: String,
    /// Lines ingested after normalization
    pub lines: usize,
    /// Boundary candidates detected
    pub candidates: usize,
    /// Controls successfully extracted
    pub controls_found: usize,
    /// Controls the profile expects at minimum
    pub expected_minimum: usize,
    /// Controls assembled from more than one page or table
    pub multi_table_controls: Vec<ControlId>,
    /// Controls that could not be assembled
    pub failures: Vec<FailedControl>,
    /// Integrity warnings raised during assembly
    pub warnings: Vec<IntegrityWarning>,
    /// Number of controls per quality grade, every grade present
    pub grade_distribution: BTreeMap<QualityGrade, usize>,
    /// Mean quality score of extracted controls, 0 when there are none
    pub mean_score: f64,
    /// Score a control needs to pass
    pub pass_threshold: f64,
    /// Controls scoring below the pass threshold
    pub below_threshold: Vec<ControlId>,
    /// Chunks produced
    pub chunk_count: usize,
    /// Mode the executor ran in
    pub execution_mode: ExecutionMode,
    /// Wall time of the whole run in milliseconds
    pub elapsed_ms: f64,
    /// Overall verdict
    pub status: RunStatus,
    /// What to look at next
    pub recommendations: Vec<String>,
}

impl ValidationReport {
    /// Build the report from a finished run
    pub fn build(profile: &Profile, ctx: RunContext, extraction: &Extraction) -> Self {
        let pass_threshold = profile.pass_threshold();
        let mut grade_distribution: BTreeMap<QualityGrade, usize> =
            QualityGrade::ALL.iter().map(|g| (*g, 0)).collect();
        let mut multi_table_controls = Vec::new();
        let mut failures = Vec::new();
        let mut below_threshold = Vec::new();
        let mut score_sum = 0.0;
        let mut controls_found = 0usize;

        for outcome in &extraction.outcomes {
            match outcome {
                ControlOutcome::Extracted(record) => {
                    controls_found += 1;
                    score_sum += record.score();
                    if let Some(quality) = &record.quality {
                        *grade_distribution.entry(quality.grade).or_default() += 1;
                    }
                    if record.multi_table {
                        multi_table_controls.push(record.identifier.clone());
                    }
                    if record.score() < pass_threshold {
                        below_threshold.push(record.identifier.clone());
                    }
                }
                ControlOutcome::Failed { identifier, reason } => failures.push(FailedControl {
                    identifier: identifier.clone(),
                    reason: reason.clone(),
                }),
            }
        }

        let mean_score = if controls_found == 0 {
            0.0
        } else {
            (score_sum / controls_found as f64 * 10.0).round() / 10.0
        };

        let mut report = Self {
            profile: ctx.profile.clone(),
            lines: ctx.lines,
            candidates: ctx.candidates,
            controls_found,
            expected_minimum: profile.expected_minimum_controls(),
            multi_table_controls,
            failures,
            warnings: ctx.warnings.clone(),
            grade_distribution,
            mean_score,
            pass_threshold,
            below_threshold,
            chunk_count: extraction.chunks.len(),
            execution_mode: ctx.mode_used,
            elapsed_ms: ctx.elapsed().as_secs_f64() * 1000.0,
            status: RunStatus::Failed,
            recommendations: Vec::new(),
        };
        report.status = report.verdict();
        report.recommendations = report.recommend();

        tracing::info!(
            profile = %report.profile,
            controls = report.controls_found,
            failures = report.failures.len(),
            mean_score = report.mean_score,
            status = %report.status,
            "extraction finished"
        );
        report
    }

    /// Report for a run that had no input lines at all
    pub fn empty(profile: &Profile, ctx: RunContext) -> Self {
        Self::build(profile, ctx, &Extraction::default())
    }

    /// True unless the run failed outright
    pub fn is_usable(&self) -> bool {
        self.status != RunStatus::Failed
    }

    fn verdict(&self) -> RunStatus {
        if self.controls_found == 0 {
            RunStatus::Failed
        } else if self.controls_found < self.expected_minimum
            || !self.failures.is_empty()
            || !self.below_threshold.is_empty()
        {
            RunStatus::Degraded
        } else {
            RunStatus::Passed
        }
    }

    fn recommend(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.lines == 0 {
            out.push("Input contained no text lines: check the document conversion step".to_string());
            return out;
        }
        if self.candidates == 0 {
            out.push(format!(
                "No control identifiers found in {} lines: check that the '{}' profile's identifier pattern matches this document",
                self.lines, self.profile
            ));
            return out;
        }
        if self.controls_found < self.expected_minimum {
            out.push(format!(
                "Found {} controls, expected at least {}: the input may be truncated or the conversion may have merged table cells",
                self.controls_found, self.expected_minimum
            ));
        }
        if !self.failures.is_empty() {
            out.push(format!(
                "{} controls could not be assembled: inspect their source pages for empty or duplicated spans",
                self.failures.len()
            ));
        }
        if !self.below_threshold.is_empty() {
            out.push(format!(
                "{} controls scored below {:.1}: review their per-control issues for missing sections",
                self.below_threshold.len(),
                self.pass_threshold
            ));
        }
        if !self.multi_table_controls.is_empty() {
            out.push(format!(
                "{} controls were merged across pages or tables: spot-check their continuation joins",
                self.multi_table_controls.len()
            ));
        }
        if !self.warnings.is_empty() {
            out.push(format!(
                "{} integrity warnings were raised during assembly",
                self.warnings.len()
            ));
        }
        out
    }
}
