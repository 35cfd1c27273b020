//! Markdown output formatter

use super::OutputFormatter;
use anyhow::Result;
use ctrlseg_api::Output;
use std::io::Write;

/// Markdown formatter - one section per control
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    control_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            control_count: 0,
        }
    }
}

impl<W: Write> OutputFormatter for MarkdownFormatter<W> {
    fn format_document(&mut self, source: &str, output: &Output) -> Result<()> {
        writeln!(self.writer, "# {source}")?;
        writeln!(self.writer)?;
        for control in &output.controls {
            self.control_count += 1;
            writeln!(self.writer, "## {}", control.identifier)?;
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "*Quality: {} ({:.1})*",
                control.quality_grade, control.quality_score
            )?;
            writeln!(self.writer)?;
            writeln!(self.writer, "{}", control.content)?;
            writeln!(self.writer)?;
        }
        writeln!(self.writer, "*Status: {}*", output.report.status)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total controls: {}*", self.control_count)?;
        self.writer.flush()?;
        Ok(())
    }
}
