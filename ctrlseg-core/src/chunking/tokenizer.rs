//! Word/punctuation tokenizer used for sizing
//!
//! A token is either a maximal run of alphanumeric characters and underscores,
//! or any single other non-whitespace character. Counts depend only on the
//! text, never on a model vocabulary.

/// Byte range of one token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
}

impl Token {
    /// The token text inside `source`
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Tokenize `text` into byte ranges
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if is_word_char(c) {
            word_start.get_or_insert(i);
            continue;
        }
        if let Some(start) = word_start.take() {
            tokens.push(Token { start, end: i });
        }
        if !c.is_whitespace() {
            tokens.push(Token {
                start: i,
                end: i + c.len_utf8(),
            });
        }
    }
    if let Some(start) = word_start {
        tokens.push(Token {
            start,
            end: text.len(),
        });
    }

    tokens
}

/// Number of tokens in `text`
pub fn count_tokens(text: &str) -> usize {
    tokenize(text).len()
}
