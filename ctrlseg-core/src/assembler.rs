//! Control assembly
//!
//! Groups resolved spans by identifier, merges them, renders their lines and
//! joins non-adjacent spans with the continuation separator.

use crate::boundary::{ResolvedSpan, RunningHeaderFilter};
use crate::identifier::ControlId;
use crate::line_store::{LineSpan, LineStore, SourceRef};
use crate::quality::QualityReport;
use crate::sections::{SectionKind, SectionMark};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One control with its assembled content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlRecord {
    pub identifier: ControlId,
    /// Sorted, pairwise non-overlapping spans
    pub line_ranges: Vec<LineSpan>,
    /// Pages and tables that contributed lines, in document order
    pub sources: Vec<SourceRef>,
    pub multi_table: bool,
    pub sections: BTreeMap<SectionKind, bool>,
    pub section_marks: Vec<SectionMark>,
    pub content: String,
    pub quality: Option<QualityReport>,
    /// Per-record remarks that are not integrity problems
    pub notes: Vec<String>,
}

impl ControlRecord {
    /// Create an unclassified, unscored record
    ///
    /// Returns `None` unless `line_ranges` is non-empty, sorted and free of overlaps.
    pub fn new(
        identifier: ControlId,
        line_ranges: Vec<LineSpan>,
        sources: Vec<SourceRef>,
        content: String,
    ) -> Option<Self> {
        if line_ranges.is_empty() || !ranges_are_ordered(&line_ranges) {
            return None;
        }
        Some(Self {
            identifier,
            line_ranges,
            multi_table: sources.len() > 1,
            sources,
            sections: BTreeMap::new(),
            section_marks: Vec::new(),
            content,
            quality: None,
            notes: Vec::new(),
        })
    }

    /// True if the section was found in the content
    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.sections.get(&kind).copied().unwrap_or(false)
    }

    /// Quality score, 0 when not scored yet
    pub fn score(&self) -> f64 {
        self.quality.as_ref().map(|q| q.score).unwrap_or(0.0)
    }
}

/// True when spans are sorted and no two share a line
pub fn ranges_are_ordered(ranges: &[LineSpan]) -> bool {
    ranges.windows(2).all(|w| w[0].end < w[1].start)
}

/// Result of assembling one identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ControlOutcome {
    Extracted(ControlRecord),
    Failed { identifier: ControlId, reason: String },
}

impl ControlOutcome {
    /// Identifier of either variant
    pub fn identifier(&self) -> &ControlId {
        match self {
            ControlOutcome::Extracted(record) => &record.identifier,
            ControlOutcome::Failed { identifier, .. } => identifier,
        }
    }

    /// The record, if extraction succeeded
    pub fn record(&self) -> Option<&ControlRecord> {
        match self {
            ControlOutcome::Extracted(record) => Some(record),
            ControlOutcome::Failed { .. } => None,
        }
    }
}

/// Kind of data-integrity problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A span rendered to no content
    EmptySpan,
    /// Two spans of one identifier shared lines and were merged
    OverlappingSpans,
    /// An identifier ended up with no usable span
    NoSpans,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WarningKind::EmptySpan => "empty_span",
            WarningKind::OverlappingSpans => "overlapping_spans",
            WarningKind::NoSpans => "no_spans",
        };
        f.write_str(s)
    }
}

/// Data-integrity warning attached to an identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityWarning {
    pub identifier: ControlId,
    pub kind: WarningKind,
    pub message: String,
}

impl IntegrityWarning {
    fn new(identifier: &ControlId, kind: WarningKind, message: String) -> Self {
        tracing::warn!(identifier = %identifier, kind = %kind, "{message}");
        Self {
            identifier: identifier.clone(),
            kind,
            message,
        }
    }
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.identifier, self.kind, self.message)
    }
}

/// Assembly settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Inserted between non-adjacent spans of one control
    pub continuation_separator: String,
    /// Omit running header/footer lines from content
    pub strip_running_headers: bool,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            continuation_separator: "\n\n[continued]\n\n".to_string(),
            strip_running_headers: true,
        }
    }
}

/// Outcome of one identifier group
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledControl {
    pub outcome: ControlOutcome,
    pub warnings: Vec<IntegrityWarning>,
}

/// Outcome of a whole document, in identifier order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assembly {
    pub outcomes: Vec<ControlOutcome>,
    pub warnings: Vec<IntegrityWarning>,
}

impl Assembly {
    /// Successfully assembled records
    pub fn records(&self) -> impl Iterator<Item = &ControlRecord> {
        self.outcomes.iter().filter_map(ControlOutcome::record)
    }

    /// Records keyed by identifier
    pub fn into_map(self) -> BTreeMap<ControlId, ControlRecord> {
        self.outcomes
            .into_iter()
            .filter_map(|o| match o {
                ControlOutcome::Extracted(r) => Some((r.identifier.clone(), r)),
                ControlOutcome::Failed { .. } => None,
            })
            .collect()
    }
}

/// Builds [`ControlRecord`]s from resolved spans
#[derive(Debug, Clone, Default)]
pub struct ControlAssembler {
    options: AssemblyOptions,
    headers: RunningHeaderFilter,
}

impl ControlAssembler {
    pub fn new(options: AssemblyOptions, headers: RunningHeaderFilter) -> Self {
        Self { options, headers }
    }

    pub fn options(&self) -> &AssemblyOptions {
        &self.options
    }

    /// Group spans by identifier; groups come out in numeric identifier order
    pub fn group(resolved: &[ResolvedSpan]) -> BTreeMap<ControlId, Vec<LineSpan>> {
        let mut groups: BTreeMap<ControlId, Vec<LineSpan>> = BTreeMap::new();
        for r in resolved {
            groups
                .entry(r.candidate.identifier.clone())
                .or_default()
                .push(r.span);
        }
        groups
    }

    /// Assemble every identifier group sequentially
    pub fn assemble(&self, store: &LineStore, resolved: &[ResolvedSpan]) -> Assembly {
        let mut assembly = Assembly::default();
        for (identifier, spans) in Self::group(resolved) {
            let assembled = self.assemble_one(store, identifier, spans);
            assembly.outcomes.push(assembled.outcome);
            assembly.warnings.extend(assembled.warnings);
        }
        tracing::debug!(
            controls = assembly.outcomes.len(),
            warnings = assembly.warnings.len(),
            "assembly finished"
        );
        assembly
    }

    /// Assemble one identifier from its spans
    pub fn assemble_one(
        &self,
        store: &LineStore,
        identifier: ControlId,
        spans: Vec<LineSpan>,
    ) -> AssembledControl {
        let mut warnings = Vec::new();
        let merged = merge_spans(&identifier, spans, &mut warnings);

        let mut kept: Vec<(LineSpan, String)> = Vec::new();
        let mut notes = Vec::new();
        for span in merged {
            let text = self.render(store, span);
            if text.trim().is_empty() {
                warnings.push(IntegrityWarning::new(
                    &identifier,
                    WarningKind::EmptySpan,
                    format!("span {span} has no content"),
                ));
                continue;
            }
            let normalized = normalize_whitespace(&text);
            if kept.iter().any(|(_, t)| normalize_whitespace(t) == normalized) {
                notes.push(format!("dropped span {span}: identical to an earlier span"));
                continue;
            }
            kept.push((span, text));
        }

        if kept.is_empty() {
            warnings.push(IntegrityWarning::new(
                &identifier,
                WarningKind::NoSpans,
                "no resolvable span".to_string(),
            ));
            return AssembledControl {
                outcome: ControlOutcome::Failed {
                    identifier,
                    reason: "no resolvable content".to_string(),
                },
                warnings,
            };
        }

        let mut sources: Vec<SourceRef> = Vec::new();
        for (span, _) in &kept {
            for source in store.span_sources(*span) {
                if !sources.contains(&source) {
                    sources.push(source);
                }
            }
        }

        let content = kept
            .iter()
            .map(|(_, t)| t.as_str())
            .collect::<Vec<_>>()
            .join(&self.options.continuation_separator);
        let ranges = kept.into_iter().map(|(span, _)| span).collect();

        let outcome = match ControlRecord::new(identifier.clone(), ranges, sources, content) {
            Some(mut record) => {
                record.notes = notes;
                ControlOutcome::Extracted(record)
            }
            None => ControlOutcome::Failed {
                identifier,
                reason: "line ranges out of order after merge".to_string(),
            },
        };

        AssembledControl { outcome, warnings }
    }

    fn render(&self, store: &LineStore, span: LineSpan) -> String {
        store
            .span_lines(span)
            .iter()
            .map(|line| line.text())
            .filter(|text| !(self.options.strip_running_headers && self.headers.is_running_header(text)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Sort and merge adjacent or overlapping spans
///
/// Adjacent spans merge silently. Overlapping spans merge into their union
/// and produce a warning.
fn merge_spans(
    identifier: &ControlId,
    mut spans: Vec<LineSpan>,
    warnings: &mut Vec<IntegrityWarning>,
) -> Vec<LineSpan> {
    spans.sort();
    spans.dedup();

    let mut merged: Vec<LineSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if last.overlaps(&span) => {
                warnings.push(IntegrityWarning::new(
                    identifier,
                    WarningKind::OverlappingSpans,
                    format!("spans {last} and {span} overlap, using their union"),
                ));
                *last = last.union(&span);
            }
            Some(last) if last.touches(&span) => *last = last.union(&span),
            _ => merged.push(span),
        }
    }
    merged
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
