//! Dedup command implementation

use crate::error::CliError;
use crate::input::FileReader;
use anyhow::{Context, Result};
use clap::Args;
use ctrlseg_api::{reconcile, MappingTuple};
use std::path::PathBuf;

/// Arguments for the dedup command
#[derive(Debug, Args)]
pub struct DedupArgs {
    /// JSON file holding an array of `[subject, relation, detail]` tuples
    #[arg(short, long, value_name = "FILE", required = true)]
    pub input: PathBuf,

    /// Where to write the unique tuples (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// List every duplicated tuple on stderr
    #[arg(long)]
    pub show_duplicates: bool,
}

impl DedupArgs {
    /// Execute the dedup command
    pub fn execute(&self) -> Result<()> {
        let content = FileReader::read_text(&self.input)?;
        let tuples: Vec<MappingTuple> = serde_json::from_str(&content).map_err(|e| {
            CliError::ProcessingError(format!("{}: expected an array of 3-element arrays: {e}", self.input.display()))
        })?;

        let report = reconcile(tuples);
        if !report.invariant_holds {
            return Err(CliError::ValidationFailed(format!(
                "{} - {} != {}",
                report.original_count, report.removed, report.final_count
            ))
            .into());
        }

        let json = serde_json::to_string_pretty(&report.unique)?;
        match &self.output {
            Some(path) => std::fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write to {}", path.display()))?,
            None => println!("{json}"),
        }

        eprintln!(
            "original: {}, removed: {}, final: {}",
            report.original_count, report.removed, report.final_count
        );
        if self.show_duplicates {
            for group in &report.duplicate_groups {
                eprintln!("  {} x{}", group.tuple, group.occurrences);
            }
        }
        log::info!(
            "deduplicated {} tuples into {}",
            report.original_count,
            report.final_count
        );
        Ok(())
    }
}
