//! Normalized, indexed line sequence
//!
//! The store is the only owner of [`Line`] values. Everything downstream refers
//! to lines by index.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a block of raw text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Origin {
    /// Running paragraph text
    Paragraph,
    /// A cell of an extracted table
    TableCell {
        /// Ordinal of the table in the document
        table: usize,
    },
}

/// Provenance of a line, used to detect multi-table continuation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "ordinal")]
pub enum SourceRef {
    /// A page of paragraph text
    Page(usize),
    /// A table
    Table(usize),
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRef::Page(n) => write!(f, "page:{n}"),
            SourceRef::Table(n) => write!(f, "table:{n}"),
        }
    }
}

/// A raw block handed over by the upstream converter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBlock {
    /// Raw text, possibly spanning several lines
    pub text: String,
    /// Source page
    pub page: usize,
    /// Paragraph or table cell
    pub origin: Origin,
}

impl RawBlock {
    /// Paragraph block on the given page
    pub fn paragraph(text: impl Into<String>, page: usize) -> Self {
        Self {
            text: text.into(),
            page,
            origin: Origin::Paragraph,
        }
    }

    /// Table cell block on the given page
    pub fn table_cell(text: impl Into<String>, page: usize, table: usize) -> Self {
        Self {
            text: text.into(),
            page,
            origin: Origin::TableCell { table },
        }
    }
}

/// One trimmed, non-empty line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    index: usize,
    text: String,
    page: usize,
    origin: Origin,
    gap_before: usize,
}

impl Line {
    /// Ordinal position in the store
    pub fn index(&self) -> usize {
        self.index
    }

    /// Trimmed text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Source page
    pub fn page(&self) -> usize {
        self.page
    }

    /// Paragraph or table cell
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Number of blank lines removed immediately before this line
    pub fn gap_before(&self) -> usize {
        self.gap_before
    }

    /// Table ordinal for table cells, page otherwise
    pub fn source(&self) -> SourceRef {
        match self.origin {
            Origin::TableCell { table } => SourceRef::Table(table),
            Origin::Paragraph => SourceRef::Page(self.page),
        }
    }

    /// Character length of the trimmed text
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Inclusive range of line indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineSpan {
    /// First line (inclusive)
    pub start: usize,
    /// Last line (inclusive)
    pub end: usize,
}

impl LineSpan {
    /// Create a span; `start` must not exceed `end`
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {start} after end {end}");
        Self { start, end }
    }

    /// Number of lines covered
    pub fn line_count(&self) -> usize {
        self.end + 1 - self.start
    }

    /// True if the spans share a line or touch end-to-start
    pub fn touches(&self, other: &LineSpan) -> bool {
        self.start <= other.end.saturating_add(1) && other.start <= self.end.saturating_add(1)
    }

    /// True if the spans share at least one line
    pub fn overlaps(&self, other: &LineSpan) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Smallest span covering both
    pub fn union(&self, other: &LineSpan) -> LineSpan {
        LineSpan::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Display for LineSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Ordered sequence of normalized lines
#[derive(Debug, Clone, Default)]
pub struct LineStore {
    lines: Vec<Line>,
}

impl LineStore {
    /// Normalize raw blocks into lines
    ///
    /// Blocks are split on newlines, each piece is trimmed, and empty pieces are
    /// dropped. Blank paragraph lines are remembered as `gap_before` on the next
    /// kept line; whitespace-only table cells vanish without leaving a gap.
    pub fn ingest<I>(blocks: I) -> Self
    where
        I: IntoIterator<Item = RawBlock>,
    {
        let mut lines = Vec::new();
        let mut gap = 0usize;

        for block in blocks {
            let is_cell = matches!(block.origin, Origin::TableCell { .. });
            for piece in block.text.lines() {
                let text = normalize_line(piece);
                if text.is_empty() {
                    if !is_cell {
                        gap += 1;
                    }
                    continue;
                }
                lines.push(Line {
                    index: lines.len(),
                    text,
                    page: block.page,
                    origin: block.origin,
                    gap_before: gap,
                });
                gap = 0;
            }
        }

        tracing::debug!(lines = lines.len(), "line store ingested");
        Self { lines }
    }

    /// Paragraph lines on page 1, mostly for tests and quick experiments
    pub fn from_texts<S: AsRef<str>>(texts: &[S]) -> Self {
        Self::ingest(
            texts
                .iter()
                .map(|t| RawBlock::paragraph(t.as_ref(), 1)),
        )
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when nothing survived normalization
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line at `index`
    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// All lines in order
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Iterate lines in order
    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }

    /// Lines covered by `span`, clamped to the store
    pub fn span_lines(&self, span: LineSpan) -> &[Line] {
        if span.start >= self.lines.len() {
            return &[];
        }
        let end = span.end.min(self.lines.len() - 1);
        &self.lines[span.start..=end]
    }

    /// Distinct sources of the lines in `span`, in first-seen order
    pub fn span_sources(&self, span: LineSpan) -> Vec<SourceRef> {
        let mut sources: Vec<SourceRef> = Vec::new();
        for line in self.span_lines(span) {
            let source = line.source();
            if !sources.contains(&source) {
                sources.push(source);
            }
        }
        sources
    }
}

/// Trim and replace layout whitespace the converters tend to leave behind
fn normalize_line(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '\u{a0}' | '\t' => ' ',
            other => other,
        })
        .filter(|c| !matches!(c, '\u{200b}' | '\u{feff}'))
        .collect::<String>()
        .trim()
        .to_string()
}
