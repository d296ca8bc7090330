//! Module for extracting Lisp tokens from an input string.
//!
//! The tokenizer is a small state machine, run lazily:
//! each call to [`Iterator::next`] runs it until one token is ready.
//! It never looks further ahead than the character after the current lexeme.
//!
//! The stream always ends with exactly one [`TokenKind::Eof`] or one [`TokenKind::Error`];
//! after that the iterator is exhausted.

use std::iter::FusedIterator;

use crate::data::QuoteKind;

/// The kind of a Lisp token.
///
/// Whitespace and comments produce no tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    ListOpen,
    ListClose,
    VectorOpen,
    VectorClose,
    Quote,
    Quasiquote,
    Unquote,
    UnquoteSplice,
    Ident,
    String,
    Integer,
    Float,
    Eof,
    /// A malformed lexeme. `incomplete` is set when more input could have fixed it.
    Error { message: String, incomplete: bool },
}

impl TokenKind {
    /// The quoting kind, if this is a prefix token.
    pub fn quote_kind(&self) -> Option<QuoteKind> {
        match self {
            TokenKind::Quote => Some(QuoteKind::Quote),
            TokenKind::Quasiquote => Some(QuoteKind::Quasiquote),
            TokenKind::Unquote => Some(QuoteKind::Unquote),
            TokenKind::UnquoteSplice => Some(QuoteKind::UnquoteSplice),
            _ => None,
        }
    }
}

/// A token along with its starting byte offset and its text in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub pos: usize,
    pub text: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delim {
    Paren,
    Bracket,
}

impl Delim {
    fn name(self) -> &'static str {
        match self {
            Delim::Paren => "paren",
            Delim::Bracket => "bracket",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Dispatch,
    Prefix { kind: QuoteKind, start: usize },
    Str { start: usize },
    Integer { start: usize },
    Float { start: usize },
    Symbol { start: usize },
    Comment,
}

enum Step<'a> {
    Goto(State),
    Emit(Token<'a>),
}

/// Characters that end a number or symbol.
fn is_delimiter(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | ')' | ']' | ';')
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Splits one input chunk into tokens, on demand.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    /// Open delimiters and their offsets, innermost last.
    open: Vec<(Delim, usize)>,
    done: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Tokenizer {
            input,
            pos: 0,
            open: Vec::new(),
            done: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Step<'a> {
        Step::Emit(Token {
            kind,
            pos: start,
            text: &self.input[start..self.pos],
        })
    }

    fn error(&self, start: usize, message: String, incomplete: bool) -> Step<'a> {
        self.token(
            TokenKind::Error {
                message,
                incomplete,
            },
            start,
        )
    }

    /// Runs the state machine from `Dispatch` until a token is produced.
    fn lex(&mut self) -> Token<'a> {
        let mut state = State::Dispatch;
        loop {
            let step = match state {
                State::Dispatch => self.dispatch(),
                State::Prefix { kind, start } => self.prefix(kind, start),
                State::Str { start } => self.string(start),
                State::Integer { start } => self.integer(start),
                State::Float { start } => self.float(start),
                State::Symbol { start } => self.symbol(start),
                State::Comment => self.comment(),
            };
            match step {
                Step::Goto(next) => state = next,
                Step::Emit(token) => return token,
            }
        }
    }

    fn dispatch(&mut self) -> Step<'a> {
        self.bump_while(is_space);
        let start = self.pos;
        let Some(c) = self.bump() else {
            return self.end_of_input();
        };
        let next = match c {
            '(' => return self.open(Delim::Paren, start),
            ')' => return self.close(Delim::Paren, start),
            '[' => return self.open(Delim::Bracket, start),
            ']' => return self.close(Delim::Bracket, start),
            '\'' => State::Prefix {
                kind: QuoteKind::Quote,
                start,
            },
            '`' => State::Prefix {
                kind: QuoteKind::Quasiquote,
                start,
            },
            ',' if self.peek() == Some('@') => {
                self.bump();
                State::Prefix {
                    kind: QuoteKind::UnquoteSplice,
                    start,
                }
            }
            ',' => State::Prefix {
                kind: QuoteKind::Unquote,
                start,
            },
            '"' => State::Str { start },
            ';' => State::Comment,
            c if c.is_ascii_digit() => State::Integer { start },
            _ => State::Symbol { start },
        };
        Step::Goto(next)
    }

    fn end_of_input(&mut self) -> Step<'a> {
        match self.open.last() {
            Some(&(delim, at)) => {
                // Point at the opener, not at the end.
                Step::Emit(Token {
                    kind: TokenKind::Error {
                        message: format!("unclosed {}", delim.name()),
                        incomplete: true,
                    },
                    pos: at,
                    text: &self.input[at..at + 1],
                })
            }
            None => self.token(TokenKind::Eof, self.pos),
        }
    }

    fn open(&mut self, delim: Delim, start: usize) -> Step<'a> {
        self.open.push((delim, start));
        let kind = match delim {
            Delim::Paren => TokenKind::ListOpen,
            Delim::Bracket => TokenKind::VectorOpen,
        };
        self.token(kind, start)
    }

    fn close(&mut self, delim: Delim, start: usize) -> Step<'a> {
        match self.open.pop() {
            Some((open, _)) if open == delim => {
                let kind = match delim {
                    Delim::Paren => TokenKind::ListClose,
                    Delim::Bracket => TokenKind::VectorClose,
                };
                self.token(kind, start)
            }
            Some((open, at)) => self.error(
                start,
                format!(
                    "unexpected close {}: {} opened at byte {} is still open",
                    delim.name(),
                    open.name(),
                    at
                ),
                false,
            ),
            None => self.error(start, format!("unexpected close {}", delim.name()), false),
        }
    }

    /// Quoting prefixes mark the next form; they don't consume it.
    fn prefix(&mut self, kind: QuoteKind, start: usize) -> Step<'a> {
        let end = self.pos;
        self.bump_while(|c| c == ' ');
        let kind = match kind {
            QuoteKind::Quote => TokenKind::Quote,
            QuoteKind::Quasiquote => TokenKind::Quasiquote,
            QuoteKind::Unquote => TokenKind::Unquote,
            QuoteKind::UnquoteSplice => TokenKind::UnquoteSplice,
        };
        Step::Emit(Token {
            kind,
            pos: start,
            text: &self.input[start..end],
        })
    }

    fn string(&mut self, start: usize) -> Step<'a> {
        loop {
            match self.bump() {
                Some('"') => return self.token(TokenKind::String, start),
                // A backslash takes the next character as-is.
                Some('\\') => {
                    if self.bump().is_none() {
                        break;
                    }
                }
                Some(_) => (),
                None => break,
            }
        }
        self.error(start, "unterminated string".to_owned(), true)
    }

    fn integer(&mut self, start: usize) -> Step<'a> {
        self.bump_while(|c| c.is_ascii_digit());
        match self.peek() {
            None => self.token(TokenKind::Integer, start),
            Some(c) if is_delimiter(c) => self.token(TokenKind::Integer, start),
            Some('.') => {
                self.bump();
                Step::Goto(State::Float { start })
            }
            Some(c) => self.error(
                start,
                format!("unexpected character {c:?} in integer literal"),
                false,
            ),
        }
    }

    fn float(&mut self, start: usize) -> Step<'a> {
        self.bump_while(|c| c.is_ascii_digit());
        match self.peek() {
            None => self.token(TokenKind::Float, start),
            Some(c) if is_delimiter(c) => self.token(TokenKind::Float, start),
            Some(c) => self.error(
                start,
                format!("unexpected character {c:?} in float literal"),
                false,
            ),
        }
    }

    fn symbol(&mut self, start: usize) -> Step<'a> {
        self.bump_while(|c| !is_delimiter(c));
        self.token(TokenKind::Ident, start)
    }

    fn comment(&mut self) -> Step<'a> {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
        Step::Goto(State::Dispatch)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let token = self.lex();
        if matches!(token.kind, TokenKind::Eof | TokenKind::Error { .. }) {
            self.done = true;
        }
        tracing::trace!(kind = ?token.kind, pos = token.pos, text = token.text, "token");
        Some(token)
    }
}

impl FusedIterator for Tokenizer<'_> {}
