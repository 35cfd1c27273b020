//! Data Transfer Objects for API

use ctrlseg_core::{dedup, Chunk, ControlRecord, MappingTuple};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::PathBuf;

/// Input source for processing
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Input {
    /// Converted document text (form feeds and pipe tables allowed)
    Text(String),
    /// JSONL blocks, one `{"text", "page", "table"?}` object per line
    Jsonl(String),
    /// File path; `.jsonl` is read as JSONL
    File(PathBuf),
    /// Raw bytes (UTF-8)
    Bytes(Vec<u8>),
    /// Reader (not serializable)
    #[cfg_attr(feature = "serde", serde(skip))]
    Reader(Box<dyn Read + Send>),
}

impl std::fmt::Debug for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Input::Jsonl(text) => f.debug_tuple("Jsonl").field(&text.len()).finish(),
            Input::File(path) => f.debug_tuple("File").field(path).finish(),
            Input::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Input::Reader(_) => f.debug_tuple("Reader").field(&"<dyn Read>").finish(),
        }
    }
}

impl Input {
    /// Create input from text
    pub fn from_text(text: impl Into<String>) -> Self {
        Input::Text(text.into())
    }

    /// Create input from JSONL text
    pub fn from_jsonl(text: impl Into<String>) -> Self {
        Input::Jsonl(text.into())
    }

    /// Create input from file path
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Input::File(path.into())
    }

    /// Create input from bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }

    /// Create input from a reader
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        Input::Reader(Box::new(reader))
    }

    pub(crate) fn into_engine(self) -> ctrlseg_engine::Input {
        match self {
            Input::Text(text) => ctrlseg_engine::Input::Text(text),
            Input::Jsonl(text) => ctrlseg_engine::Input::Jsonl(text),
            Input::File(path) => ctrlseg_engine::Input::File(path),
            Input::Bytes(bytes) => ctrlseg_engine::Input::Bytes(bytes),
            Input::Reader(reader) => ctrlseg_engine::Input::Reader(reader),
        }
    }
}

/// Per-control artifact handed to persistence
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlArtifact {
    /// Control identifier as written, e.g. `1.2.8`
    pub identifier: String,
    /// Assembled content
    pub content: String,
    /// Inclusive line ranges in document order
    pub line_ranges: Vec<(usize, usize)>,
    /// Contributing pages and tables, e.g. `table:4`
    pub sources: Vec<String>,
    /// True when content came from more than one page or table
    pub multi_table: bool,
    /// Section presence keyed by section name
    pub sections: BTreeMap<String, bool>,
    /// Quality score in `0..=100`
    pub quality_score: f64,
    /// Quality grade name
    pub quality_grade: String,
    /// Scoring issues
    pub issues: Vec<String>,
    /// Scoring recommendations
    pub recommendations: Vec<String>,
    /// Assembly notes
    pub notes: Vec<String>,
}

impl From<&ControlRecord> for ControlArtifact {
    fn from(record: &ControlRecord) -> Self {
        let (quality_score, quality_grade, issues, recommendations) = match &record.quality {
            Some(q) => (
                q.score,
                q.grade.to_string(),
                q.issues.clone(),
                q.recommendations.clone(),
            ),
            None => (0.0, "unscored".to_string(), Vec::new(), Vec::new()),
        };
        Self {
            identifier: record.identifier.to_string(),
            content: record.content.clone(),
            line_ranges: record.line_ranges.iter().map(|s| (s.start, s.end)).collect(),
            sources: record.sources.iter().map(ToString::to_string).collect(),
            multi_table: record.multi_table,
            sections: record
                .sections
                .iter()
                .map(|(kind, present)| (kind.as_str().to_string(), *present))
                .collect(),
            quality_score,
            quality_grade,
            issues,
            recommendations,
            notes: record.notes.clone(),
        }
    }
}

impl ControlArtifact {
    /// Flat key/value form, one document per control
    ///
    /// List values are joined with `"; "`, line ranges are written `start-end`.
    pub fn to_flat_document(&self) -> BTreeMap<String, String> {
        let mut doc = BTreeMap::new();
        doc.insert("identifier".to_string(), self.identifier.clone());
        doc.insert("content".to_string(), self.content.clone());
        doc.insert("quality_score".to_string(), format!("{:.1}", self.quality_score));
        doc.insert("quality_grade".to_string(), self.quality_grade.clone());
        doc.insert("multi_table".to_string(), self.multi_table.to_string());
        for (section, present) in &self.sections {
            doc.insert(format!("section.{section}"), present.to_string());
        }
        let ranges: Vec<String> = self
            .line_ranges
            .iter()
            .map(|(start, end)| format!("{start}-{end}"))
            .collect();
        doc.insert("line_ranges".to_string(), ranges.join("; "));
        doc.insert("sources".to_string(), self.sources.join("; "));
        doc.insert("issues".to_string(), self.issues.join("; "));
        doc.insert("recommendations".to_string(), self.recommendations.join("; "));
        doc
    }
}

/// Metadata columns of a chunk
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkMetadata {
    /// `"{control_id}#{sequence_index}"`
    pub chunk_id: String,
    /// Owning control
    pub control_id: String,
    /// Position within the control, from 0
    pub sequence_index: usize,
    /// Tokens including the overlap prefix
    pub token_count: usize,
    /// Quality score of the owning control
    pub quality_score: f64,
}

/// Chunk artifact for indexing: a `text` field plus metadata
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkArtifact {
    /// Chunk text including the overlap prefix
    pub text: String,
    /// Metadata columns
    pub metadata: ChunkMetadata,
}

impl ChunkArtifact {
    /// Artifact from a chunk and the score of its control
    pub fn new(chunk: &Chunk, quality_score: f64) -> Self {
        Self {
            text: chunk.content.clone(),
            metadata: ChunkMetadata {
                chunk_id: chunk.id.clone(),
                control_id: chunk.control_id.to_string(),
                sequence_index: chunk.sequence_index,
                token_count: chunk.token_count,
                quality_score,
            },
        }
    }
}

/// A control that could not be extracted
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FailureDTO {
    /// Control identifier
    pub identifier: String,
    /// Why extraction failed
    pub reason: String,
}

/// Complete output of one document
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Output {
    /// Extracted controls in identifier order
    pub controls: Vec<ControlArtifact>,
    /// Controls that could not be extracted
    pub failures: Vec<FailureDTO>,
    /// Chunks in control order
    pub chunks: Vec<ChunkArtifact>,
    /// Run summary
    pub report: ctrlseg_engine::ValidationReport,
}

impl Output {
    /// Artifact of one control
    pub fn control(&self, identifier: &str) -> Option<&ControlArtifact> {
        self.controls.iter().find(|c| c.identifier == identifier)
    }
}

/// A tuple that occurred more than once
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DuplicateTuple {
    /// The repeated tuple
    pub tuple: MappingTuple,
    /// Total occurrences, including the kept one
    pub occurrences: usize,
}

/// Reconciliation report of a mapping deduplication
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MappingReconciliation {
    /// Tuples before deduplication
    pub original_count: usize,
    /// Repeats dropped
    pub removed: usize,
    /// Tuples after deduplication
    pub final_count: usize,
    /// Tuples seen more than once
    pub duplicate_groups: Vec<DuplicateTuple>,
    /// `original_count - removed == final_count`
    pub invariant_holds: bool,
    /// Unique tuples in first-seen order
    pub unique: Vec<MappingTuple>,
}

/// Deduplicate mapping tuples and account for every removal
pub fn reconcile(tuples: Vec<MappingTuple>) -> MappingReconciliation {
    let outcome = dedup(tuples);
    let original_count = outcome.original_count();
    let final_count = outcome.final_count();
    MappingReconciliation {
        original_count,
        removed: outcome.removed,
        final_count,
        invariant_holds: original_count - outcome.removed == final_count,
        duplicate_groups: outcome
            .duplicate_groups
            .into_iter()
            .map(|g| DuplicateTuple {
                tuple: g.value,
                occurrences: g.occurrences,
            })
            .collect(),
        unique: outcome.unique,
    }
}
