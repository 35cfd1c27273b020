//! Artifact directory writer
//!
//! Layout: `controls/<identifier>.json` holds the flat document of each
//! control, `chunks.jsonl` one chunk per line, `report.json` the run report.

use anyhow::{Context, Result};
use ctrlseg_api::Output;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes the artifacts of one document into a directory
pub struct ArtifactWriter {
    root: PathBuf,
}

impl ArtifactWriter {
    /// Writer rooted at `root`, created on first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Target directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write all artifacts, returning the number of files written
    pub fn write(&self, output: &Output) -> Result<usize> {
        let controls_dir = self.root.join("controls");
        fs::create_dir_all(&controls_dir)
            .with_context(|| format!("Failed to create {}", controls_dir.display()))?;

        let mut written = 0;
        for control in &output.controls {
            let path = controls_dir.join(format!("{}.json", control.identifier));
            let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
            serde_json::to_writer_pretty(BufWriter::new(file), &control.to_flat_document())?;
            written += 1;
        }

        let chunks_path = self.root.join("chunks.jsonl");
        let file = File::create(&chunks_path)
            .with_context(|| format!("Failed to create {}", chunks_path.display()))?;
        let mut writer = BufWriter::new(file);
        for chunk in &output.chunks {
            serde_json::to_writer(&mut writer, chunk)?;
            writeln!(writer)?;
        }
        writer.flush()?;
        written += 1;

        let report_path = self.root.join("report.json");
        let file = File::create(&report_path)
            .with_context(|| format!("Failed to create {}", report_path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &output.report)?;
        written += 1;

        log::info!("wrote {written} artifacts to {}", self.root.display());
        Ok(written)
    }
}
