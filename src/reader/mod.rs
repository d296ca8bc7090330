//! Support for reading Lisp expressions from strings.

use crate::data::SExpr;

mod location;
mod parse;
mod token;

pub use location::Location;
pub use parse::{Reader, DEFAULT_MAX_DEPTH};
pub use token::{Token, TokenKind, Tokenizer};

/// Parse the string as a list of top-level Lisp expressions.
pub fn read(input: &str, max_depth: usize) -> ReadResult<Vec<SExpr>> {
    Reader::new(Tokenizer::new(input), max_depth).read_all()
}

/// A malformed lexeme: the tokenizer's error token, surfaced by the reader.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LexError {
    pub pos: usize,
    pub message: String,
    pub incomplete: bool,
}

/// A token stream that doesn't form a tree: unmatched brackets, dangling prefixes,
/// or nesting beyond the configured limit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub pos: usize,
    pub message: String,
    pub incomplete: bool,
}

impl ParseError {
    pub(crate) fn new(pos: usize, message: impl Into<String>) -> Self {
        ParseError {
            pos,
            message: message.into(),
            incomplete: false,
        }
    }

    pub(crate) fn incomplete(pos: usize, message: impl Into<String>) -> Self {
        ParseError {
            pos,
            message: message.into(),
            incomplete: true,
        }
    }
}

/// Error type if a read does not complete.
///
/// A reader may experience a true tokenizing/parsing error, e.g. "())", that no additional input can fix.
/// This is distinct from a reader that gets an unexpected end-of-input, e.g. "(()":
/// it may be that more input will fix the issue.
///
/// If input is coming in interactively, this is a useful distinction;
/// in the first case, we'd want to indicate an error to the user,
/// while in the latter we'd like to prompt the user for more input.
/// [`ReadError::is_incomplete`] covers this distinction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl ReadError {
    pub fn pos(&self) -> usize {
        match self {
            ReadError::Lex(e) => e.pos,
            ReadError::Parse(e) => e.pos,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ReadError::Lex(e) => &e.message,
            ReadError::Parse(e) => &e.message,
        }
    }

    /// Whether more input might complete the read.
    pub fn is_incomplete(&self) -> bool {
        match self {
            ReadError::Lex(e) => e.incomplete,
            ReadError::Parse(e) => e.incomplete,
        }
    }
}

/// The main result type for this module.
pub type ReadResult<T> = Result<T, ReadError>;
