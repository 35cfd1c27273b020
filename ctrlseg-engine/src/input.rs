//! Input abstraction for control extraction
//!
//! Every input is reduced to the ordered raw blocks the line store ingests.
//! Plain text may carry form feeds (page breaks) and markdown pipe tables, as
//! produced by the usual document converters. JSONL carries one block per line.

use crate::error::{EngineError, Result};
use ctrlseg_core::RawBlock;
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

/// Unified input abstraction
pub enum Input {
    /// Text with optional form feeds and pipe tables
    Text(String),
    /// Static text reference (zero-copy for string literals)
    TextRef(&'static str),
    /// JSONL, one `{"text", "page", "table"?}` object per line
    Jsonl(String),
    /// Blocks already split by the caller
    Blocks(Vec<RawBlock>),
    /// File path; `.jsonl` files are read as JSONL, anything else as text
    File(PathBuf),
    /// Bytes to process as UTF-8 text
    Bytes(Vec<u8>),
    /// Reader stream (for stdin, etc.), read as text
    Reader(Box<dyn Read + Send>),
}

impl std::fmt::Debug for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Input::TextRef(text) => f.debug_tuple("TextRef").field(text).finish(),
            Input::Jsonl(text) => f
                .debug_tuple("Jsonl")
                .field(&format!("<{} lines>", text.lines().count()))
                .finish(),
            Input::Blocks(blocks) => f
                .debug_tuple("Blocks")
                .field(&format!("<{} blocks>", blocks.len()))
                .finish(),
            Input::File(path) => f.debug_tuple("File").field(path).finish(),
            Input::Bytes(bytes) => f
                .debug_tuple("Bytes")
                .field(&format!("<{} bytes>", bytes.len()))
                .finish(),
            Input::Reader(_) => f.debug_tuple("Reader").field(&"<Reader>").finish(),
        }
    }
}

impl Input {
    /// Create input from a text string
    pub fn from_text<S: Into<String>>(text: S) -> Self {
        Input::Text(text.into())
    }

    /// Create input from a static string reference (zero-copy)
    pub fn from_text_ref(text: &'static str) -> Self {
        Input::TextRef(text)
    }

    /// Create input from JSONL text
    pub fn from_jsonl<S: Into<String>>(text: S) -> Self {
        Input::Jsonl(text.into())
    }

    /// Create input from blocks
    pub fn from_blocks(blocks: Vec<RawBlock>) -> Self {
        Input::Blocks(blocks)
    }

    /// Create input from a file path
    pub fn from_file<P: Into<PathBuf>>(path: P) -> Self {
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

    /// Convert the input into raw blocks
    pub fn into_blocks(self) -> Result<Vec<RawBlock>> {
        match self {
            Input::Text(text) => Ok(parse_text(&text)),
            Input::TextRef(text) => Ok(parse_text(text)),
            Input::Jsonl(text) => parse_jsonl(&text),
            Input::Blocks(blocks) => Ok(blocks),
            Input::File(path) => {
                let text = fs::read_to_string(&path).map_err(|e| {
                    EngineError::IoError(format!("Failed to read file {path:?}: {e}"))
                })?;
                let is_jsonl = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("jsonl"));
                if is_jsonl {
                    parse_jsonl(&text)
                } else {
                    Ok(parse_text(&text))
                }
            }
            Input::Bytes(bytes) => String::from_utf8(bytes)
                .map(|text| parse_text(&text))
                .map_err(|e| EngineError::EncodingError(format!("Invalid UTF-8: {e}"))),
            Input::Reader(mut reader) => {
                let mut buffer = Vec::new();
                reader.read_to_end(&mut buffer).map_err(|e| {
                    EngineError::IoError(format!("Failed to read from stream: {e}"))
                })?;
                let text = String::from_utf8(buffer).map_err(|e| {
                    EngineError::EncodingError(format!("Invalid UTF-8 from stream: {e}"))
                })?;
                Ok(parse_text(&text))
            }
        }
    }

    /// Get the estimated size of the input in bytes (if available)
    pub fn estimated_size(&self) -> Option<usize> {
        match self {
            Input::Text(text) | Input::Jsonl(text) => Some(text.len()),
            Input::TextRef(text) => Some(text.len()),
            Input::Blocks(blocks) => Some(blocks.iter().map(|b| b.text.len()).sum()),
            Input::Bytes(bytes) => Some(bytes.len()),
            Input::File(path) => fs::metadata(path).ok().map(|m| m.len() as usize),
            Input::Reader(_) => None,
        }
    }
}

impl From<String> for Input {
    fn from(text: String) -> Self {
        Input::Text(text)
    }
}

impl From<&'static str> for Input {
    fn from(text: &'static str) -> Self {
        Input::TextRef(text)
    }
}

impl From<Vec<RawBlock>> for Input {
    fn from(blocks: Vec<RawBlock>) -> Self {
        Input::Blocks(blocks)
    }
}

/// Split converter text into blocks
///
/// Pages are separated by form feeds and numbered from 1. Each contiguous pipe
/// table gets the next table ordinal (from 1); its non-empty cells become
/// table-cell blocks and its `|---|` separator rows are skipped. Markdown
/// heading markers are removed from paragraph lines.
pub fn parse_text(text: &str) -> Vec<RawBlock> {
    let mut blocks = Vec::new();
    let mut table = 0usize;

    for (page_index, page_text) in text.split('\x0c').enumerate() {
        let page = page_index + 1;
        let mut paragraph: Vec<&str> = Vec::new();
        let mut in_table = false;

        for line in page_text.lines() {
            let trimmed = line.trim();
            if trimmed.starts_with('|') {
                flush_paragraph(&mut blocks, &mut paragraph, page);
                if !in_table {
                    table += 1;
                    in_table = true;
                }
                let cells = split_row(trimmed);
                if cells.iter().all(|c| is_separator_cell(c)) {
                    continue;
                }
                blocks.extend(
                    cells
                        .into_iter()
                        .filter(|c| !c.is_empty())
                        .map(|c| RawBlock::table_cell(c, page, table)),
                );
            } else {
                in_table = false;
                paragraph.push(strip_heading(line));
            }
        }
        flush_paragraph(&mut blocks, &mut paragraph, page);
    }

    blocks
}

fn flush_paragraph(blocks: &mut Vec<RawBlock>, paragraph: &mut Vec<&str>, page: usize) {
    if paragraph.is_empty() {
        return;
    }
    blocks.push(RawBlock::paragraph(paragraph.join("\n"), page));
    paragraph.clear();
}

fn strip_heading(line: &str) -> &str {
    let trimmed = line.trim_start();
    let hashes = trimmed.len() - trimmed.trim_start_matches('#').len();
    if (1..=6).contains(&hashes) && trimmed[hashes..].starts_with(' ') {
        trimmed[hashes..].trim_start()
    } else {
        line
    }
}

fn split_row(row: &str) -> Vec<String> {
    let inner = row.strip_prefix('|').unwrap_or(row);
    let inner = inner.strip_suffix('|').unwrap_or(inner);

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

fn is_separator_cell(cell: &str) -> bool {
    let core = cell.trim_matches(':');
    !core.is_empty() && core.chars().all(|c| c == '-')
}

#[derive(Deserialize)]
struct JsonBlock {
    text: String,
    #[serde(default = "first_page")]
    page: usize,
    #[serde(default)]
    table: Option<usize>,
}

fn first_page() -> usize {
    1
}

/// Parse JSONL blocks; blank lines are skipped
pub fn parse_jsonl(text: &str) -> Result<Vec<RawBlock>> {
    let mut blocks = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let block: JsonBlock = serde_json::from_str(line).map_err(|e| EngineError::InputFormat {
            line: i + 1,
            reason: e.to_string(),
        })?;
        blocks.push(match block.table {
            Some(table) => RawBlock::table_cell(block.text, block.page, table),
            None => RawBlock::paragraph(block.text, block.page),
        });
    }
    Ok(blocks)
}
