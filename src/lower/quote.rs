//! Quoting: code-shaped syntax as literal data.
//!
//! Quoted data has this shape in Go:
//! -   numbers and strings are literals,
//! -   symbols are `Symbol("name")`,
//! -   lists and vectors are `[]any{...}`.
//!
//! Inside a quasiquote, `,x` is evaluated and `,@xs` is spliced in with `append(acc, xs...)`.
//! Quasiquotes nest: each inner quasiquote needs one more unquote before anything is evaluated.

use crate::data::{Atom, Node, QuoteKind, SExpr};
use crate::goast::Expr;

use super::{LowerError, LowerResult, Lowerer};

/// Go type of quoted lists and vectors.
pub(super) const SEQUENCE_TYPE: &str = "[]any";

/// Constructor that quoted symbols are passed through.
pub(super) const SYMBOL_CONSTRUCTOR: &str = "Symbol";

fn sequence(elts: Vec<Expr>) -> Expr {
    Expr::CompositeLit {
        ty: SEQUENCE_TYPE.to_owned(),
        elts,
    }
}

fn symbol(name: &str) -> Expr {
    Expr::call(Expr::ident(SYMBOL_CONSTRUCTOR), vec![Expr::string(name)])
}

/// `(quote x)` as data: `[]any{Symbol("quote"), x}`.
fn tagged(kind: QuoteKind, inner: Expr) -> Expr {
    sequence(vec![symbol(kind.form_name()), inner])
}

fn append(base: Expr, mut args: Vec<Expr>, ellipsis: bool) -> Expr {
    args.insert(0, base);
    Expr::Call {
        func: Box::new(Expr::ident("append")),
        args,
        ellipsis,
    }
}

impl Lowerer<'_> {
    /// Lowers `kind` applied to `inner`; `whole` is the quoting form, for errors.
    pub(super) fn quoted(&self, kind: QuoteKind, inner: &SExpr, whole: &SExpr) -> LowerResult<Expr> {
        match kind {
            QuoteKind::Quote => self.datum(inner),
            QuoteKind::Quasiquote => self.quasi(inner, 1),
            QuoteKind::Unquote | QuoteKind::UnquoteSplice => Err(LowerError::new(
                whole,
                format!("{} outside of quasiquote", kind.form_name()),
            )),
        }
    }

    /// Fully-quoted data: nothing inside is evaluated.
    fn datum(&self, expr: &SExpr) -> LowerResult<Expr> {
        match &expr.node {
            Node::Atom(Atom::Symbol(name)) => Ok(symbol(name)),
            Node::Atom(atom) => self.atom(atom, expr),
            Node::List(items) | Node::Vector(items) => {
                Ok(sequence(items.iter().map(|e| self.datum(e)).collect::<LowerResult<_>>()?))
            }
            Node::Quoted(kind, inner) => Ok(tagged(*kind, self.datum(inner)?)),
        }
    }

    /// Quasiquoted data at the given nesting `depth` (1 for the outermost quasiquote).
    fn quasi(&self, expr: &SExpr, depth: usize) -> LowerResult<Expr> {
        if let Some((kind, inner)) = expr.as_quoted() {
            return match kind {
                QuoteKind::Unquote if depth == 1 => self.expr(inner),
                QuoteKind::UnquoteSplice if depth == 1 => Err(LowerError::new(
                    expr,
                    "unquote-splice must appear inside a list",
                )),
                QuoteKind::Unquote | QuoteKind::UnquoteSplice => {
                    Ok(tagged(kind, self.quasi(inner, depth - 1)?))
                }
                QuoteKind::Quasiquote => Ok(tagged(kind, self.quasi(inner, depth + 1)?)),
                QuoteKind::Quote => Ok(tagged(kind, self.quasi(inner, depth)?)),
            };
        }
        match &expr.node {
            Node::List(items) | Node::Vector(items) => self.quasi_sequence(items, depth),
            _ => self.datum(expr),
        }
    }

    /// Builds the sequence left to right, switching to `append` once a splice appears.
    fn quasi_sequence(&self, items: &[SExpr], depth: usize) -> LowerResult<Expr> {
        let mut built: Option<Expr> = None;
        let mut pending = Vec::new();
        for item in items {
            match item.as_quoted() {
                Some((QuoteKind::UnquoteSplice, inner)) if depth == 1 => {
                    let spliced = self.expr(inner)?;
                    let base = match built.take() {
                        None => sequence(std::mem::take(&mut pending)),
                        Some(acc) if pending.is_empty() => acc,
                        Some(acc) => append(acc, std::mem::take(&mut pending), false),
                    };
                    built = Some(append(base, vec![spliced], true));
                }
                _ => pending.push(self.quasi(item, depth)?),
            }
        }
        Ok(match built {
            None => sequence(pending),
            Some(acc) if pending.is_empty() => acc,
            Some(acc) => append(acc, pending, false),
        })
    }
}
