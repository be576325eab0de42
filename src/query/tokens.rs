//! Query tokenizer and token queue.
//!
//! The tokenizer splits a raw query on whitespace while keeping three
//! kinds of spans intact as single tokens: quoted string literals,
//! bracketed clauses (`select[type file]`, `size[KiB]`) and parenthesized
//! groups (tuples and nested sub-conditions), including arbitrary
//! nesting. Parsers consume the result through a strict FIFO queue.

use std::collections::VecDeque;

use super::ParseError;

/// Splits a raw query string into tokens.
///
/// # Errors
/// Fails on an unterminated quote/bracket/parenthesis or an unmatched
/// closing delimiter.
pub fn tokenize(query: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut token = String::new();
    // Stack of closing delimiters we are nested inside.
    let mut open: Vec<char> = Vec::new();

    for ch in query.chars() {
        // Inside a quoted span everything is literal until the closing quote.
        if let Some(&closer) = open.last() {
            if closer == '\'' || closer == '"' {
                token.push(ch);
                if ch == closer {
                    open.pop();
                }
                continue;
            }
        }

        match ch {
            '\'' | '"' => {
                open.push(ch);
                token.push(ch);
            }
            '[' => {
                open.push(']');
                token.push(ch);
            }
            '(' => {
                open.push(')');
                token.push(ch);
            }
            ']' | ')' => {
                if open.last() == Some(&ch) {
                    open.pop();
                    token.push(ch);
                } else {
                    return Err(ParseError::UnbalancedDelimiter(ch));
                }
            }
            c if c.is_whitespace() && open.is_empty() => {
                if !token.is_empty() {
                    tokens.push(std::mem::take(&mut token));
                }
            }
            c => token.push(c),
        }
    }

    if let Some(closer) = open.pop() {
        return Err(ParseError::UnterminatedDelimiter(closer));
    }
    if !token.is_empty() {
        tokens.push(token);
    }

    Ok(tokens)
}

/// Splits the inside of a tuple on top-level commas, respecting quoted
/// and nested spans. Used for `in`/`between` operand lists and bracketed
/// operation parameters.
pub fn split_list(inner: &str) -> Result<Vec<String>, ParseError> {
    let mut parts = Vec::new();
    let mut part = String::new();
    let mut open: Vec<char> = Vec::new();

    for ch in inner.chars() {
        if let Some(&closer) = open.last() {
            part.push(ch);
            if (closer == '\'' || closer == '"') && ch == closer
                || (closer == ']' || closer == ')') && ch == closer
            {
                open.pop();
            } else if closer != '\'' && closer != '"' {
                match ch {
                    '[' => open.push(']'),
                    '(' => open.push(')'),
                    '\'' | '"' => open.push(ch),
                    _ => {}
                }
            }
            continue;
        }

        match ch {
            ',' => parts.push(std::mem::take(&mut part)),
            '\'' | '"' => {
                open.push(ch);
                part.push(ch);
            }
            '[' => {
                open.push(']');
                part.push(ch);
            }
            '(' => {
                open.push(')');
                part.push(ch);
            }
            c => part.push(c),
        }
    }

    if let Some(closer) = open.pop() {
        return Err(ParseError::UnterminatedDelimiter(closer));
    }
    parts.push(part);

    Ok(parts.into_iter().map(|p| p.trim().to_string()).collect())
}

/// Strips one pair of matching surrounding quotes, if present.
#[must_use]
pub fn strip_quotes(token: &str) -> &str {
    if token.len() >= 2
        && ((token.starts_with('\'') && token.ends_with('\''))
            || (token.starts_with('"') && token.ends_with('"')))
    {
        &token[1..token.len() - 1]
    } else {
        token
    }
}

/// Ordered token sequence consumed front-to-back by the grammar parsers.
#[derive(Debug, Clone, Default)]
pub struct TokenQueue {
    tokens: VecDeque<String>,
}

impl TokenQueue {
    /// Tokenizes a raw query string into a fresh queue.
    ///
    /// # Errors
    /// Propagates tokenizer failures.
    pub fn from_query(query: &str) -> Result<Self, ParseError> {
        Ok(Self {
            tokens: tokenize(query)?.into(),
        })
    }

    /// Reads the front token without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<&str> {
        self.tokens.front().map(String::as_str)
    }

    /// Consumes and returns the front token.
    ///
    /// # Errors
    /// Fails when the queue is exhausted.
    pub fn pop(&mut self) -> Result<String, ParseError> {
        self.tokens.pop_front().ok_or(ParseError::UnexpectedEnd)
    }

    /// Appends a token at the back of the queue.
    pub fn add(&mut self, token: String) {
        self.tokens.push_back(token);
    }

    /// Consumes every remaining token.
    #[must_use]
    pub fn drain(&mut self) -> Vec<String> {
        self.tokens.drain(..).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

impl From<Vec<String>> for TokenQueue {
    fn from(tokens: Vec<String>) -> Self {
        Self {
            tokens: tokens.into(),
        }
    }
}
