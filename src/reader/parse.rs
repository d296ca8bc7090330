//! Recursive-descent reader: tokens in, S-expressions out.
//!
//! The reader pulls one token at a time and never looks further ahead.
//! Nesting is bounded by `max_depth`, so adversarial input fails with an error
//! rather than exhausting the stack.

use crate::data::{Atom, QuoteKind, SExpr};

use super::{LexError, ParseError, ReadResult, Token, TokenKind};

/// Default bound on list/vector/quote nesting.
///
/// Lowering recurses once per level with larger frames than the reader,
/// so this is sized for lowering to fit in a default 2 MiB thread stack.
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Close {
    Paren,
    Bracket,
}

impl Close {
    fn name(self) -> &'static str {
        match self {
            Close::Paren => "paren",
            Close::Bracket => "bracket",
        }
    }
}

/// Builds S-expressions from a token source.
///
/// A reader consumes its source once; it holds no state besides the current depth.
pub struct Reader<I> {
    tokens: I,
    depth: usize,
    max_depth: usize,
    /// Offset of the last token pulled, for errors when the source runs dry.
    last_pos: usize,
}

impl<'a, I> Reader<I>
where
    I: Iterator<Item = Token<'a>>,
{
    pub fn new(tokens: I, max_depth: usize) -> Self {
        Reader {
            tokens,
            depth: 0,
            max_depth,
            last_pos: 0,
        }
    }

    /// Reads every top-level form up to end-of-input.
    pub fn read_all(mut self) -> ReadResult<Vec<SExpr>> {
        let mut forms = Vec::new();
        loop {
            let token = self.pull()?;
            if token.kind == TokenKind::Eof {
                tracing::debug!(forms = forms.len(), "read complete");
                return Ok(forms);
            }
            forms.push(self.form(token)?);
        }
    }

    /// Next token; error tokens become errors here, so callers never see them.
    fn pull(&mut self) -> ReadResult<Token<'a>> {
        let Some(token) = self.tokens.next() else {
            return Err(ParseError::incomplete(
                self.last_pos,
                "token stream ended without end-of-input",
            )
            .into());
        };
        self.last_pos = token.pos;
        match token.kind {
            TokenKind::Error {
                message,
                incomplete,
            } => Err(LexError {
                pos: token.pos,
                message,
                incomplete,
            }
            .into()),
            _ => Ok(token),
        }
    }

    fn enter(&mut self, pos: usize) -> ReadResult<()> {
        if self.depth >= self.max_depth {
            return Err(ParseError::new(
                pos,
                format!("nesting too deep: limit is {}", self.max_depth),
            )
            .into());
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Reads the form that starts with `token`.
    fn form(&mut self, token: Token<'a>) -> ReadResult<SExpr> {
        let pos = token.pos;
        let atom = match token.kind {
            TokenKind::ListOpen => return Ok(SExpr::list(self.sequence(pos, Close::Paren)?, pos)),
            TokenKind::VectorOpen => {
                return Ok(SExpr::vector(self.sequence(pos, Close::Bracket)?, pos))
            }
            TokenKind::ListClose => {
                return Err(ParseError::new(pos, "unexpected close paren").into())
            }
            TokenKind::VectorClose => {
                return Err(ParseError::new(pos, "unexpected close bracket").into())
            }
            TokenKind::Quote => return self.quoted(QuoteKind::Quote, pos),
            TokenKind::Quasiquote => return self.quoted(QuoteKind::Quasiquote, pos),
            TokenKind::Unquote => return self.quoted(QuoteKind::Unquote, pos),
            TokenKind::UnquoteSplice => return self.quoted(QuoteKind::UnquoteSplice, pos),
            TokenKind::Eof => {
                return Err(ParseError::incomplete(pos, "unexpected end of input").into())
            }
            TokenKind::Error {
                message,
                incomplete,
            } => {
                return Err(LexError {
                    pos,
                    message,
                    incomplete,
                }
                .into())
            }
            TokenKind::Ident => Atom::Symbol(token.text.to_owned()),
            TokenKind::String => Atom::Str(token.text.to_owned()),
            TokenKind::Integer => Atom::Int(token.text.to_owned()),
            TokenKind::Float => Atom::Float(token.text.to_owned()),
        };
        Ok(SExpr::atom(atom, pos))
    }

    /// A prefix applies to exactly one following form.
    fn quoted(&mut self, kind: QuoteKind, pos: usize) -> ReadResult<SExpr> {
        let next = self.pull()?;
        if next.kind == TokenKind::Eof {
            return Err(ParseError::incomplete(
                pos,
                format!("{} at end of input has nothing to quote", kind.form_name()),
            )
            .into());
        }
        self.enter(pos)?;
        let inner = self.form(next)?;
        self.leave();
        Ok(SExpr::quoted(kind, inner, pos))
    }

    /// Reads children up to the matching close, in source order.
    fn sequence(&mut self, open_pos: usize, close: Close) -> ReadResult<Vec<SExpr>> {
        self.enter(open_pos)?;
        let mut items = Vec::new();
        loop {
            let token = self.pull()?;
            match token.kind {
                TokenKind::ListClose | TokenKind::VectorClose => {
                    let found = if token.kind == TokenKind::ListClose {
                        Close::Paren
                    } else {
                        Close::Bracket
                    };
                    if found == close {
                        break;
                    }
                    return Err(ParseError::new(
                        token.pos,
                        format!(
                            "unexpected close {}: {} opened at byte {open_pos} is still open",
                            found.name(),
                            close.name()
                        ),
                    )
                    .into());
                }
                TokenKind::Eof => {
                    return Err(
                        ParseError::incomplete(open_pos, format!("unclosed {}", close.name()))
                            .into(),
                    )
                }
                _ => items.push(self.form(token)?),
            }
        }
        self.leave();
        Ok(items)
    }
}
