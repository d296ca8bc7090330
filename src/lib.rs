//! Lisp syntax for Go.
//!
//! Source text goes through three stages:
//! 1.  the [`reader`] tokenizes and parses it into [`data::SExpr`] trees,
//! 2.  [`lower`] translates each tree into a Go syntax tree ([`goast`]),
//! 3.  the [`printer`] renders that tree as Go source.
//!
//! [`compile`] runs the first two; [`translate`] runs all three.

use std::fmt::Write;

pub mod data;
pub mod error;
pub mod goast;
pub mod lower;
pub mod printer;
pub mod reader;
mod repl;

#[cfg(feature = "render")]
pub mod graphviz;

pub use error::{Error, Result, Stage};
pub use repl::repl;

use goast::Unit;
use lower::Registry;
use reader::{LexError, ReadError, TokenKind, Tokenizer, DEFAULT_MAX_DEPTH};

/// What to print for a translated input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Emit {
    /// Go source.
    #[default]
    Go,
    /// The parsed S-expressions, one per line.
    Sexpr,
    /// The token stream, one token per line.
    Tokens,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Deepest nesting of brackets and quotes the reader accepts.
    pub max_depth: usize,
    pub emit: Emit,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_depth: DEFAULT_MAX_DEPTH,
            emit: Emit::default(),
        }
    }
}

/// Read and lower `source` into a Go unit.
pub fn compile(source: &str, options: &Options) -> Result<Unit> {
    let forms = reader::read(source, options.max_depth)?;
    Ok(lower::lower_with_limit(
        &forms,
        &Registry::default(),
        options.max_depth,
    )?)
}

/// Read, lower, and render `source` as Go source text.
pub fn translate(source: &str, options: &Options) -> Result<String> {
    Ok(printer::render(&compile(source, options)?))
}

/// Produce the output selected by `options.emit`.
pub fn run(source: &str, options: &Options) -> Result<String> {
    match options.emit {
        Emit::Go => translate(source, options),
        Emit::Sexpr => {
            let mut out = String::new();
            for form in reader::read(source, options.max_depth)? {
                let _ = writeln!(out, "{form}");
            }
            Ok(out)
        }
        Emit::Tokens => {
            let mut out = String::new();
            for token in Tokenizer::new(source) {
                if let TokenKind::Error {
                    message,
                    incomplete,
                } = token.kind
                {
                    return Err(ReadError::from(LexError {
                        pos: token.pos,
                        message,
                        incomplete,
                    })
                    .into());
                }
                let _ = writeln!(out, "{}\t{:?}\t{}", token.pos, token.kind, token.text);
            }
            Ok(out)
        }
    }
}
