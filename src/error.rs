//! Errors from any stage of translation.

use std::fmt;

use crate::lower::LowerError;
use crate::reader::{Location, ReadError};

/// The pipeline stage an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Parse,
    Lower,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Lex => "lex",
            Stage::Parse => "parse",
            Stage::Lower => "lower",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error("lower error: {0}")]
    Lower(#[from] LowerError),
}

impl Error {
    pub fn stage(&self) -> Stage {
        match self {
            Error::Read(ReadError::Lex(_)) => Stage::Lex,
            Error::Read(ReadError::Parse(_)) => Stage::Parse,
            Error::Lower(_) => Stage::Lower,
        }
    }

    /// Byte offset in the source that the error points at.
    pub fn position(&self) -> usize {
        match self {
            Error::Read(e) => e.pos(),
            Error::Lower(e) => e.pos,
        }
    }

    /// Whether more input might fix this; see [`ReadError`].
    pub fn is_incomplete(&self) -> bool {
        match self {
            Error::Read(e) => e.is_incomplete(),
            Error::Lower(_) => false,
        }
    }

    /// The error with its line and column in `source`, e.g.
    /// `line 1 column 6: parse error: unclosed paren`.
    pub fn diagnostic(&self, source: &str) -> String {
        format!("{}: {self}", Location::of(source, self.position()))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
