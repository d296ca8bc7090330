//! The special-form registry.
//!
//! A list whose head symbol appears here is lowered by a dedicated rule;
//! any other list is a plain function call.

use std::fmt;

use crate::data::QuoteKind;
use crate::goast::BinaryOp;

/// How many arguments (elements after the head) a form takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    /// Inclusive on both ends.
    Between(usize, usize),
}

impl Arity {
    pub fn accepts(self, n: usize) -> bool {
        match self {
            Arity::Exact(want) => n == want,
            Arity::AtLeast(min) => n >= min,
            Arity::Between(min, max) => (min..=max).contains(&n),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = |n: usize| if n == 1 { "" } else { "s" };
        match *self {
            Arity::Exact(n) => write!(f, "exactly {n} argument{}", plural(n)),
            Arity::AtLeast(n) => write!(f, "at least {n} argument{}", plural(n)),
            Arity::Between(min, max) => write!(f, "{min} to {max} arguments"),
        }
    }
}

/// What a special form lowers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    /// `(package name)`
    Package,
    /// `(import "path" ...)`
    Import,
    /// `(def name value)`
    Def,
    /// `(defn name [params] body...)`
    Defn,
    /// `(fn [params] body...)`
    Fn,
    /// `(if cond then else?)`
    If,
    /// `(do body...)`
    Do,
    /// `(let [name value ...] body...)`
    Let,
    /// `(set! name value)`
    Set,
    Quote(QuoteKind),
    /// Left-folded over the arguments.
    Binary(BinaryOp),
    /// Negation with one argument, subtraction with more.
    Minus,
    Not,
}

/// These could also be called "keywords".
pub const SPECIAL_FORMS: &[(&str, Arity, Form)] = &[
    // Declarations.
    ("package", Arity::Exact(1), Form::Package),
    ("import", Arity::AtLeast(1), Form::Import),
    ("def", Arity::Exact(2), Form::Def),
    ("defn", Arity::AtLeast(2), Form::Defn),
    // Control and binding.
    ("fn", Arity::AtLeast(1), Form::Fn),
    ("if", Arity::Between(2, 3), Form::If),
    ("do", Arity::AtLeast(0), Form::Do),
    ("let", Arity::AtLeast(1), Form::Let),
    ("set!", Arity::Exact(2), Form::Set),
    // Long forms of the quoting sugar.
    ("quote", Arity::Exact(1), Form::Quote(QuoteKind::Quote)),
    ("quasiquote", Arity::Exact(1), Form::Quote(QuoteKind::Quasiquote)),
    ("unquote", Arity::Exact(1), Form::Quote(QuoteKind::Unquote)),
    ("unquote-splice", Arity::Exact(1), Form::Quote(QuoteKind::UnquoteSplice)),
    // Operators.
    ("+", Arity::AtLeast(2), Form::Binary(BinaryOp::Add)),
    ("-", Arity::AtLeast(1), Form::Minus),
    ("*", Arity::AtLeast(2), Form::Binary(BinaryOp::Mul)),
    ("/", Arity::Exact(2), Form::Binary(BinaryOp::Quo)),
    ("%", Arity::Exact(2), Form::Binary(BinaryOp::Rem)),
    ("=", Arity::Exact(2), Form::Binary(BinaryOp::Eql)),
    ("not=", Arity::Exact(2), Form::Binary(BinaryOp::Neq)),
    ("<", Arity::Exact(2), Form::Binary(BinaryOp::Lss)),
    (">", Arity::Exact(2), Form::Binary(BinaryOp::Gtr)),
    ("<=", Arity::Exact(2), Form::Binary(BinaryOp::Leq)),
    (">=", Arity::Exact(2), Form::Binary(BinaryOp::Geq)),
    ("and", Arity::AtLeast(2), Form::Binary(BinaryOp::LAnd)),
    ("or", Arity::AtLeast(2), Form::Binary(BinaryOp::LOr)),
    ("not", Arity::Exact(1), Form::Not),
];

/// Read-only lookup from head symbol to rule.
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    forms: &'static [(&'static str, Arity, Form)],
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new(SPECIAL_FORMS)
    }
}

impl Registry {
    pub fn new(forms: &'static [(&'static str, Arity, Form)]) -> Self {
        Registry { forms }
    }

    pub fn lookup(&self, name: &str) -> Option<(Arity, Form)> {
        self.forms
            .iter()
            .find(|(n, _, _)| *n == name)
            .map(|&(_, arity, form)| (arity, form))
    }
}
