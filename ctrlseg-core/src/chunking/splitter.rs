//! Token-budgeted splitting with verbatim overlap
//!
//! Every chunk owns a contiguous byte region of the content. Regions start at
//! token boundaries and whitespace stays with the preceding region, so the
//! regions concatenate back to the content exactly. Chunks after the first
//! repeat the last `overlap_tokens` tokens before their region.

use super::tokenizer::{tokenize, Token};
use crate::assembler::ControlRecord;
use crate::identifier::ControlId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A token-bounded slice of a control's content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// `"{control_id}#{sequence_index}"`
    pub id: String,
    pub control_id: ControlId,
    /// Overlap prefix followed by the chunk's own region
    pub content: String,
    pub token_count: usize,
    pub sequence_index: usize,
    /// Byte length of the repeated prefix, 0 for the first chunk
    pub overlap_prefix_len: usize,
}

impl Chunk {
    /// Content without the repeated prefix
    pub fn own_content(&self) -> &str {
        &self.content[self.overlap_prefix_len..]
    }

    /// The repeated prefix
    pub fn overlap(&self) -> &str {
        &self.content[..self.overlap_prefix_len]
    }
}

/// Rebuild the original content from ordered chunks
pub fn reassemble(chunks: &[Chunk]) -> String {
    chunks.iter().map(Chunk::own_content).collect()
}

/// Splitter settings
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkOptions {
    pub target_tokens: usize,
    pub overlap_tokens: usize,
    /// Allowed overshoot of the target, e.g. 0.2 for 20%
    pub overshoot_tolerance: f64,
    pub sentence_terminators: Vec<char>,
    /// Separator joining continuation spans, a preferred break point
    pub continuation_separator: String,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            target_tokens: 300,
            overlap_tokens: 50,
            overshoot_tolerance: 0.2,
            sentence_terminators: vec!['.', '!', '?'],
            continuation_separator: "\n\n[continued]\n\n".to_string(),
        }
    }
}

impl ChunkOptions {
    /// Hard ceiling on tokens per chunk, overlap included
    pub fn max_tokens(&self) -> usize {
        ((self.target_tokens as f64) * (1.0 + self.overshoot_tolerance)).floor() as usize
    }
}

/// Which preference produced a break
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BreakKind {
    Section,
    Sentence,
    Hard,
}

/// Splits control content into ordered chunks
#[derive(Debug, Clone, Default)]
pub struct ChunkSplitter {
    options: ChunkOptions,
}

impl ChunkSplitter {
    /// Options must satisfy `0 < target` and `overlap < target`
    pub fn new(options: ChunkOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ChunkOptions {
        &self.options
    }

    /// Split a classified record, breaking preferably at its section marks
    pub fn split(&self, record: &ControlRecord) -> Vec<Chunk> {
        let marks: Vec<usize> = record.section_marks.iter().map(|m| m.offset).collect();
        self.split_text(&record.identifier, &record.content, &marks)
    }

    /// Split raw content; `section_offsets` are byte offsets of section starts
    pub fn split_text(&self, control_id: &ControlId, content: &str, section_offsets: &[usize]) -> Vec<Chunk> {
        let tokens = tokenize(content);
        let starts = self.break_points(content, &tokens, section_offsets);

        let overlap = self
            .options
            .overlap_tokens
            .min(self.options.target_tokens.saturating_sub(1));
        let mut chunks = Vec::with_capacity(starts.len());
        for (k, &begin) in starts.iter().enumerate() {
            let finish = starts.get(k + 1).copied().unwrap_or(tokens.len());
            let region_start = if k == 0 { 0 } else { tokens[begin].start };
            let region_end = starts
                .get(k + 1)
                .map(|&next| tokens[next].start)
                .unwrap_or(content.len());

            let prefix_token = if k == 0 { begin } else { begin.saturating_sub(overlap) };
            let text_start = if k == 0 { 0 } else { tokens[prefix_token].start };

            chunks.push(Chunk {
                id: format!("{control_id}#{k}"),
                control_id: control_id.clone(),
                content: content[text_start..region_end].to_string(),
                token_count: finish - prefix_token,
                sequence_index: k,
                overlap_prefix_len: region_start - text_start,
            });
        }

        tracing::trace!(control = %control_id, chunks = chunks.len(), "content split");
        chunks
    }

    /// Token indices at which each chunk's own region begins
    fn break_points(&self, content: &str, tokens: &[Token], section_offsets: &[usize]) -> Vec<usize> {
        let mut starts = vec![0usize];
        let n = tokens.len();
        let target = self.options.target_tokens.max(1);
        let overlap = self.options.overlap_tokens.min(target - 1);
        let ceiling = self.options.max_tokens().max(target);

        let section_starts = self.section_starts(content, section_offsets);

        let mut begin = 0usize;
        loop {
            let first = starts.len() == 1;
            let (own_target, own_max) = if first {
                (target, ceiling)
            } else {
                (target - overlap, ceiling - overlap)
            };
            if n - begin <= own_max {
                break;
            }
            let own_min = (own_target / 2).max(1);

            let (next, kind) = self
                .find_break(tokens, begin + own_min, begin + own_max, |e| {
                    is_section_break(content, tokens, e, &section_starts)
                })
                .map(|e| (e, BreakKind::Section))
                .or_else(|| {
                    self.find_break(tokens, begin + own_min, begin + own_target, |e| {
                        self.is_sentence_break(content, tokens, e)
                    })
                    .map(|e| (e, BreakKind::Sentence))
                })
                .unwrap_or((begin + own_target, BreakKind::Hard));

            tracing::trace!(token = next, ?kind, "chunk break");
            starts.push(next);
            begin = next;
        }

        starts
    }

    /// Latest token index in `lo..=hi` accepted by `accept`
    fn find_break(
        &self,
        tokens: &[Token],
        lo: usize,
        hi: usize,
        accept: impl Fn(usize) -> bool,
    ) -> Option<usize> {
        let hi = hi.min(tokens.len().saturating_sub(1));
        if lo > hi {
            return None;
        }
        (lo..=hi).rev().find(|&e| accept(e))
    }

    fn section_starts(&self, content: &str, section_offsets: &[usize]) -> BTreeSet<usize> {
        let mut starts: BTreeSet<usize> = section_offsets.iter().copied().collect();
        let separator = &self.options.continuation_separator;
        if !separator.is_empty() {
            for (at, _) in content.match_indices(separator.as_str()) {
                starts.insert(at);
                starts.insert(at + separator.len());
            }
        }
        starts
    }

    fn is_sentence_break(&self, content: &str, tokens: &[Token], e: usize) -> bool {
        if e == 0 || e >= tokens.len() {
            return false;
        }
        let prev = tokens[e - 1];
        let mut chars = prev.text(content).chars();
        let terminator = matches!(
            (chars.next(), chars.next()),
            (Some(c), None) if self.options.sentence_terminators.contains(&c)
        );
        terminator && prev.end < tokens[e].start
    }
}

/// True when token `e` starts a section, follows a paragraph break, or borders a separator
fn is_section_break(content: &str, tokens: &[Token], e: usize, section_starts: &BTreeSet<usize>) -> bool {
    if e == 0 || e >= tokens.len() {
        return false;
    }
    let gap_start = tokens[e - 1].end;
    let gap_end = tokens[e].start;
    // a section start offset is a line start, i.e. inside the gap or at the token
    (gap_start < gap_end && section_starts.range(gap_start..=gap_end).next().is_some())
        || content[gap_start..gap_end].matches('\n').count() >= 2
}
