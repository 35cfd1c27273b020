//! Chunk splitting for downstream indexing

mod splitter;
mod tokenizer;

pub use splitter::{reassemble, Chunk, ChunkOptions, ChunkSplitter};
pub use tokenizer::{count_tokens, tokenize, Token};
