//! Application orchestration for control extraction
//!
//! This crate turns documents into normalized input, runs the core pipeline
//! under a sequential, parallel or adaptive execution strategy and condenses
//! each run into a validation report.
//!
//! ```rust
//! use ctrlseg_engine::{ExtractorBuilder, Input};
//!
//! let extractor = ExtractorBuilder::new().profile("generic").build().unwrap();
//! let output = extractor
//!     .process(Input::from_text("1.1 Access to systems is restricted to authorized users."))
//!     .unwrap();
//! assert_eq!(output.report.controls_found, 1);
//! ```

#![warn(missing_docs)]

pub mod adaptive_dispatcher;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod input;
pub mod processor;
pub mod report;

// Re-export key types
pub use adaptive_dispatcher::AdaptiveDispatcher;
pub use config::EngineConfig;
pub use context::RunContext;
pub use error::{EngineError, Result};
pub use executor::{ExecutionMode, Executor, Extraction};
pub use input::Input;
pub use processor::{ControlExtractor, ExtractorBuilder, Output};
pub use report::{FailedControl, RunStatus, ValidationReport};

// Re-export from core for convenience
pub use ctrlseg_core::{
    Chunk, ControlId, ControlOutcome, ControlRecord, IntegrityWarning, Profile, QualityGrade,
    RawBlock, DEFAULT_PROFILE,
};
