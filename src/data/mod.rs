//! Lisp data types: the symbolic-expression tree produced by the reader.
//!
//! Atoms keep their literal text. Numbers are not parsed here;
//! whether `99999999999999999999` is a usable integer is decided during lowering.
//!
//! Each node remembers the byte offset it started at, for diagnostics.
//! Equality ignores offsets: two trees are equal when they have the same shape and text,
//! regardless of the whitespace or comments around them in the source.

use std::fmt;

/// A leaf of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    Symbol(String),
    /// Digit run, e.g. `42`.
    Int(String),
    /// Digit run with a fractional part, e.g. `1.5`.
    Float(String),
    /// String literal, including its surrounding quotes.
    /// Escapes are kept as written.
    Str(String),
}

/// The four kinds of quoting sugar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteKind {
    Quote,
    Quasiquote,
    Unquote,
    UnquoteSplice,
}

impl QuoteKind {
    /// Name of the equivalent long form, e.g. `'x` is `(quote x)`.
    pub fn form_name(self) -> &'static str {
        match self {
            QuoteKind::Quote => "quote",
            QuoteKind::Quasiquote => "quasiquote",
            QuoteKind::Unquote => "unquote",
            QuoteKind::UnquoteSplice => "unquote-splice",
        }
    }

    /// The reader-macro prefix for this kind.
    pub fn prefix(self) -> &'static str {
        match self {
            QuoteKind::Quote => "'",
            QuoteKind::Quasiquote => "`",
            QuoteKind::Unquote => ",",
            QuoteKind::UnquoteSplice => ",@",
        }
    }

    /// Inverse of [`QuoteKind::form_name`].
    pub fn from_form_name(name: &str) -> Option<Self> {
        match name {
            "quote" => Some(QuoteKind::Quote),
            "quasiquote" => Some(QuoteKind::Quasiquote),
            "unquote" => Some(QuoteKind::Unquote),
            "unquote-splice" => Some(QuoteKind::UnquoteSplice),
            _ => None,
        }
    }
}

/// The shape of an S-expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Atom(Atom),
    /// `( ... )`
    List(Vec<SExpr>),
    /// `[ ... ]`
    Vector(Vec<SExpr>),
    Quoted(QuoteKind, Box<SExpr>),
}

/// A symbolic expression, along with its starting offset in the input.
#[derive(Debug, Clone)]
pub struct SExpr {
    pub node: Node,
    pub pos: usize,
}

impl PartialEq for SExpr {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl SExpr {
    pub fn new(node: Node, pos: usize) -> Self {
        SExpr { node, pos }
    }

    pub fn atom(atom: Atom, pos: usize) -> Self {
        Self::new(Node::Atom(atom), pos)
    }

    pub fn symbol(name: impl Into<String>, pos: usize) -> Self {
        Self::atom(Atom::Symbol(name.into()), pos)
    }

    pub fn list(items: Vec<SExpr>, pos: usize) -> Self {
        Self::new(Node::List(items), pos)
    }

    pub fn vector(items: Vec<SExpr>, pos: usize) -> Self {
        Self::new(Node::Vector(items), pos)
    }

    pub fn quoted(kind: QuoteKind, inner: SExpr, pos: usize) -> Self {
        Self::new(Node::Quoted(kind, Box::new(inner)), pos)
    }

    /// The symbol name, if this is a symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match &self.node {
            Node::Atom(Atom::Symbol(s)) => Some(s),
            _ => None,
        }
    }

    /// The head symbol of a non-empty list whose first element is a symbol.
    pub fn head_symbol(&self) -> Option<&str> {
        match &self.node {
            Node::List(items) => items.first().and_then(SExpr::as_symbol),
            _ => None,
        }
    }

    /// Nesting depth, counted the way the reader counts it:
    /// 0 for an atom, one more than the deepest child for lists, vectors and quotes.
    ///
    /// Walks with an explicit stack, so it is safe on trees of any depth.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0)];
        while let Some((expr, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            match &expr.node {
                Node::Atom(_) => (),
                Node::List(items) | Node::Vector(items) => {
                    deepest = deepest.max(depth + 1);
                    pending.extend(items.iter().map(|item| (item, depth + 1)));
                }
                Node::Quoted(_, inner) => pending.push((inner, depth + 1)),
            }
        }
        deepest
    }

    /// Sees through both quoting spellings:
    /// `'x` and `(quote x)` both give `(Quote, x)`.
    pub fn as_quoted(&self) -> Option<(QuoteKind, &SExpr)> {
        match &self.node {
            Node::Quoted(kind, inner) => Some((*kind, inner)),
            Node::List(items) if items.len() == 2 => {
                let kind = QuoteKind::from_form_name(items[0].as_symbol()?)?;
                Some((kind, &items[1]))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Symbol(s) | Atom::Int(s) | Atom::Float(s) | Atom::Str(s) => f.write_str(s),
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: &str, items: &[SExpr], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

/// Renders the expression as Lisp text that reads back as the same tree.
impl fmt::Display for SExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Node::Atom(atom) => write!(f, "{atom}"),
            Node::List(items) => write_seq(f, "(", items, ")"),
            Node::Vector(items) => write_seq(f, "[", items, "]"),
            Node::Quoted(kind, inner) => write!(f, "{}{}", kind.prefix(), inner),
        }
    }
}
