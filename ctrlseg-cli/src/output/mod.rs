//! Output formatting module

use anyhow::Result;
use ctrlseg_api::Output;
use std::io::Write;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format the extraction output of one document
    fn format_document(&mut self, source: &str, output: &Output) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod artifacts;
pub mod json;
pub mod markdown;
pub mod text;

pub use artifacts::ArtifactWriter;
pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Control content with a short summary per document
    Text,
    /// JSON array with controls, chunks and report per document
    Json,
    /// Markdown with one heading per control
    Markdown,
}

impl OutputFormat {
    /// Formatter writing to `writer`
    pub fn formatter<W: Write + 'static>(self, writer: W, pretty_json: bool) -> Box<dyn OutputFormatter> {
        match self {
            OutputFormat::Text => Box::new(TextFormatter::new(writer)),
            OutputFormat::Json => Box::new(JsonFormatter::new(writer, pretty_json)),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
        }
    }
}
