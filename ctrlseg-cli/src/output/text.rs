//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use ctrlseg_api::Output;
use std::io::Write;

/// Plain text formatter - control content under a one-line header
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputFormatter for TextFormatter<W> {
    fn format_document(&mut self, source: &str, output: &Output) -> Result<()> {
        for control in &output.controls {
            writeln!(
                self.writer,
                "== {} [{} {:.1}] ==",
                control.identifier, control.quality_grade, control.quality_score
            )?;
            writeln!(self.writer, "{}", control.content)?;
            writeln!(self.writer)?;
        }
        for failure in &output.failures {
            writeln!(self.writer, "!! {}: {}", failure.identifier, failure.reason)?;
        }
        let report = &output.report;
        writeln!(
            self.writer,
            "{source}: {} controls, {} chunks, mean score {:.1}, status {}",
            report.controls_found, report.chunk_count, report.mean_score, report.status
        )?;
        for recommendation in &report.recommendations {
            writeln!(self.writer, "  - {recommendation}")?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
