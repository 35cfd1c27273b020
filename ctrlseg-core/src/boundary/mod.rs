//! Boundary detection
//!
//! Detection is split in three steps that can run independently:
//! [`BoundaryDetector::detect`] finds candidate lines, [`BoundaryDetector::scan_back`]
//! finds where each candidate's content starts, and [`resolve_spans`] turns the
//! scan outcomes into non-overlapping spans. The first two only read the line
//! store, so callers may shard them freely.

mod headers;
mod scan;

pub use headers::RunningHeaderFilter;
pub use scan::{BackwardScanner, ScanAction, ScanOutcome, ScanRule, ScanStop, RULES};

use crate::error::{CoreError, Result};
use crate::identifier::ControlId;
use crate::line_store::{Line, LineSpan, LineStore};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Compiled identifier pattern
///
/// The configured pattern is unanchored. It is wrapped twice: once to find
/// candidates (identifier, optional separator, whitespace, content) and once
/// to find any line led by an identifier, such as `1.2.7.a Examine ...`.
#[derive(Debug, Clone)]
pub struct IdentifierPattern {
    source: String,
    candidate: Regex,
    led: Regex,
}

impl IdentifierPattern {
    /// Compile a pattern such as `[A-Z]?\d+(?:\.\d+)+`
    pub fn new(pattern: &str) -> Result<Self> {
        let whole = Regex::new(&format!("^(?:{pattern})$"))
            .map_err(|e| CoreError::pattern("identifier.pattern", e))?;
        if whole.is_match("") {
            return Err(CoreError::InvalidConfig(
                "Identifier pattern must not match the empty string".to_string(),
            ));
        }

        let candidate = Regex::new(&format!(
            r"^(?P<id>{pattern})(?:\s*[.:)\u{{2013}}\u{{2014}}-])?\s+(?P<rest>\S.*)$"
        ))
        .map_err(|e| CoreError::pattern("identifier.pattern", e))?;
        let led = Regex::new(&format!(
            r"^(?:{pattern})(?:[.\s:)\u{{2013}}\u{{2014}}-]|$)"
        ))
        .map_err(|e| CoreError::pattern("identifier.pattern", e))?;

        Ok(Self {
            source: pattern.to_string(),
            candidate,
            led,
        })
    }

    /// The configured pattern
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Identifier text when the line starts a new control
    ///
    /// A trailing dot counts as a separator only when whitespace follows, so
    /// `1.1. Access` starts `1.1` while `1.2.8.a Examine` starts nothing.
    pub fn candidate<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.candidate
            .captures(line.trim())
            .and_then(|caps| caps.name("id"))
            .map(|m| m.as_str())
    }

    /// True when the line starts with an identifier of any kind
    pub fn is_identifier_led(&self, line: &str) -> bool {
        self.led.is_match(line.trim())
    }
}

/// A line that starts a control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryCandidate {
    /// Identifier at the start of the line
    pub identifier: ControlId,
    /// Index of the line in the store
    pub line_index: usize,
    /// The line as stored
    pub raw_line: String,
}

/// A candidate together with the span of lines it owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSpan {
    pub candidate: BoundaryCandidate,
    pub span: LineSpan,
    /// Why the backward scan stopped
    pub stop: ScanStop,
}

/// Finds control boundaries in a line store
#[derive(Debug, Clone)]
pub struct BoundaryDetector {
    pattern: IdentifierPattern,
    scanner: BackwardScanner,
}

impl BoundaryDetector {
    /// Create a detector; `scanner` should share `pattern`
    pub fn new(pattern: IdentifierPattern, scanner: BackwardScanner) -> Self {
        Self { pattern, scanner }
    }

    /// The identifier pattern
    pub fn pattern(&self) -> &IdentifierPattern {
        &self.pattern
    }

    /// The backward scanner
    pub fn scanner(&self) -> &BackwardScanner {
        &self.scanner
    }

    /// Candidate for a single line, if any
    pub fn detect_line(&self, line: &Line) -> Option<BoundaryCandidate> {
        let raw = self.pattern.candidate(line.text())?;
        match ControlId::parse(raw) {
            Ok(identifier) => Some(BoundaryCandidate {
                identifier,
                line_index: line.index(),
                raw_line: line.text().to_string(),
            }),
            Err(e) => {
                tracing::debug!(line = line.index(), "pattern matched but {e}");
                None
            }
        }
    }

    /// All candidates in line order
    pub fn detect(&self, store: &LineStore) -> Vec<BoundaryCandidate> {
        let candidates: Vec<_> = store.iter().filter_map(|l| self.detect_line(l)).collect();
        tracing::debug!(candidates = candidates.len(), "boundary detection finished");
        candidates
    }

    /// Backward scan for one candidate
    pub fn scan_back(&self, store: &LineStore, candidate: &BoundaryCandidate) -> ScanOutcome {
        self.scanner.scan(store, candidate.line_index)
    }

    /// Scan every candidate and resolve their spans
    pub fn resolve(&self, store: &LineStore, candidates: Vec<BoundaryCandidate>) -> Vec<ResolvedSpan> {
        let outcomes = candidates.iter().map(|c| self.scan_back(store, c)).collect();
        resolve_spans(store.len(), candidates, outcomes)
    }
}

/// Turn scan outcomes into spans that partition the document
///
/// Each span starts at its scan start and ends right before the next
/// candidate's start, or at the last line. `outcomes[k]` belongs to
/// `candidates[k]`.
pub fn resolve_spans(
    line_count: usize,
    candidates: Vec<BoundaryCandidate>,
    outcomes: Vec<ScanOutcome>,
) -> Vec<ResolvedSpan> {
    debug_assert_eq!(candidates.len(), outcomes.len());
    if line_count == 0 {
        return Vec::new();
    }

    let mut pairs: Vec<_> = candidates.into_iter().zip(outcomes).collect();
    pairs.sort_by_key(|(c, _)| c.line_index);

    let mut starts = Vec::with_capacity(pairs.len());
    let mut floor = 0usize;
    for (candidate, outcome) in &pairs {
        let start = outcome.start.clamp(floor, candidate.line_index);
        starts.push(start);
        floor = candidate.line_index + 1;
    }

    let last = line_count - 1;
    pairs
        .into_iter()
        .enumerate()
        .map(|(k, (candidate, outcome))| {
            let end = match starts.get(k + 1) {
                Some(&next) => next.saturating_sub(1).max(candidate.line_index),
                None => last.max(candidate.line_index),
            };
            ResolvedSpan {
                span: LineSpan::new(starts[k], end),
                stop: outcome.stop,
                candidate,
            }
        })
        .collect()
}
