//! File reading utilities

use crate::error::CliError;
use anyhow::{Context, Result};
use ctrlseg_api::Input;
use std::fs;
use std::path::Path;

/// Turns files into pipeline input
pub struct FileReader;

impl FileReader {
    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()).into());
        }
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// True for `.jsonl` files
    pub fn is_jsonl(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("jsonl"))
    }

    /// Read a document as pipeline input, JSONL or text by extension
    pub fn read_input(path: &Path) -> Result<Input> {
        let text = Self::read_text(path)?;
        Ok(if Self::is_jsonl(path) {
            Input::from_jsonl(text)
        } else {
            Input::from_text(text)
        })
    }

    /// Get file size in bytes
    pub fn file_size(path: &Path) -> Result<u64> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to get metadata for: {}", path.display()))?;
        Ok(metadata.len())
    }
}
