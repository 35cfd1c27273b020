//! Structural segmentation of compliance documents into controls
//!
//! The crate turns a flat stream of extracted text into one record per
//! hierarchical control identifier (such as `1.2.8`), scores how complete each
//! record is, and splits records into token-bounded chunks for indexing.
//!
//! # Pipeline
//!
//! - [`LineStore`]: normalized, indexed lines with page/table provenance
//! - [`BoundaryDetector`]: candidate lines plus a rule-list backward scan
//! - [`ControlAssembler`]: spans grouped per identifier and joined
//! - [`SectionClassifier`] and [`QualityScorer`]: section presence and score
//! - [`ChunkSplitter`]: overlap-aware splitting that round-trips exactly
//! - [`dedup`]: first-seen-order deduplication of mapping tuples
//!
//! # Example
//!
//! ```rust
//! use ctrlseg_core::{LineStore, Profile};
//!
//! let profile = Profile::from_code("generic").unwrap();
//! let store = LineStore::from_texts(&[
//!     "1.1.1 Security policies are documented and kept current.",
//!     "1.1.1.a Examine the documentation.",
//! ]);
//!
//! let detector = profile.detector();
//! let candidates = detector.detect(&store);
//! let spans = detector.resolve(&store, candidates);
//! let assembly = profile.assembler().assemble(&store, &spans);
//!
//! let record = assembly.records().next().unwrap();
//! assert_eq!(record.identifier.as_str(), "1.1.1");
//! ```

pub mod assembler;
pub mod boundary;
pub mod chunking;
pub mod dedup;
pub mod error;
pub mod identifier;
pub mod line_store;
pub mod profile;
pub mod quality;
pub mod sections;

pub use assembler::{
    AssembledControl, Assembly, AssemblyOptions, ControlAssembler, ControlOutcome, ControlRecord,
    IntegrityWarning, WarningKind,
};
pub use boundary::{
    resolve_spans, BackwardScanner, BoundaryCandidate, BoundaryDetector, IdentifierPattern,
    ResolvedSpan, RunningHeaderFilter, ScanOutcome, ScanStop,
};
pub use chunking::{count_tokens, reassemble, Chunk, ChunkOptions, ChunkSplitter};
pub use dedup::{dedup, DedupOutcome, DuplicateGroup, MappingTuple};
pub use error::{CoreError, Result};
pub use identifier::ControlId;
pub use line_store::{Line, LineSpan, LineStore, Origin, RawBlock, SourceRef};
pub use profile::{Profile, ProfileConfig, DEFAULT_PROFILE};
pub use quality::{QualityGrade, QualityReport, QualityScorer};
pub use sections::{SectionClassifier, SectionKind, SectionMark};
