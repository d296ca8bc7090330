//! Lowering: S-expressions to a Go syntax tree.
//!
//! Translation is syntax-directed. Each form is lowered according to the position it appears in:
//!
//! -   _top level_: declarations (`package`, `import`, `def`, `defn`) or statements.
//! -   _statement_: a line in a function body that isn't the last one.
//! -   _tail_: the last line of a function body; its value is returned.
//! -   _expression_: an operand, argument, or initializer.
//!
//! Forms with no expression spelling in Go (`if`, `do`, `let`) become an immediately-invoked
//! function literal in expression position.
//!
//! Lowering reads the [`Registry`] and keeps one table per unit: which Lisp symbol each
//! Go name came from. Two symbols that would share a Go name (`a-b` and `a_b`) are an error.
//! The same tree always produces the same unit.
//! The first error aborts the whole unit.
//!
//! Recursion follows the tree. Each form's depth is checked before it is lowered.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::data::{Atom, Node, SExpr};
use crate::goast::{BinaryOp, Decl, Expr, LitKind, Stmt, TopLevel, UnaryOp, Unit};
use crate::reader::DEFAULT_MAX_DEPTH;

mod forms;
mod ident;
mod quote;

#[cfg(test)]
mod lower_test;

pub use forms::{Arity, Form, Registry, SPECIAL_FORMS};
pub use ident::{mangle, parts, symbol_expr};

/// A form that can't be translated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}: {form}")]
pub struct LowerError {
    pub pos: usize,
    /// The offending form, as Lisp text.
    pub form: String,
    pub message: String,
}

impl LowerError {
    fn new(expr: &SExpr, message: impl Into<String>) -> Self {
        LowerError {
            pos: expr.pos,
            form: expr.to_string(),
            message: message.into(),
        }
    }
}

pub type LowerResult<T> = Result<T, LowerError>;

/// Lower each top-level form into one item of the unit.
pub fn lower(forms: &[SExpr], registry: &Registry) -> LowerResult<Unit> {
    lower_with_limit(forms, registry, DEFAULT_MAX_DEPTH)
}

/// [`lower`], rejecting forms nested deeper than `max_depth`.
pub fn lower_with_limit(
    forms: &[SExpr],
    registry: &Registry,
    max_depth: usize,
) -> LowerResult<Unit> {
    let lowerer = Lowerer {
        registry,
        names: RefCell::default(),
    };
    let items = forms
        .iter()
        .map(|form| {
            if form.depth() > max_depth {
                return Err(too_deep(form, max_depth));
            }
            lowerer.top_level(form)
        })
        .collect::<LowerResult<Vec<_>>>()?;
    tracing::debug!(items = items.len(), "lowered unit");
    Ok(Unit { items })
}

/// The form itself isn't printed: that would recurse as deep as the form does.
fn too_deep(form: &SExpr, max_depth: usize) -> LowerError {
    let summary = match &form.node {
        Node::List(_) => "(...)".to_owned(),
        Node::Vector(_) => "[...]".to_owned(),
        Node::Quoted(kind, _) => format!("{}...", kind.prefix()),
        Node::Atom(atom) => atom.to_string(),
    };
    LowerError {
        pos: form.pos,
        form: summary,
        message: format!("nesting too deep: limit is {max_depth}"),
    }
}

/// The contents of a Lisp string literal: quotes removed, escapes decoded.
///
/// `\n`, `\t` and `\r` are control characters; any other escaped character stands for itself.
fn unescape(text: &str) -> String {
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// A special form, matched and arity-checked.
struct Special<'e> {
    form: Form,
    name: &'e str,
    args: &'e [SExpr],
}

struct Lowerer<'r> {
    registry: &'r Registry,
    /// Go name to the Lisp symbol it was spelled from.
    names: RefCell<HashMap<String, String>>,
}

impl Lowerer<'_> {
    /// Records that `lisp` is spelled `go`; a second symbol can't take the same spelling.
    fn claim(&self, lisp: &str, go: &str, form: &SExpr) -> LowerResult<()> {
        let mut names = self.names.borrow_mut();
        let owner = names
            .entry(go.to_owned())
            .or_insert_with(|| lisp.to_owned());
        if owner != lisp {
            return Err(LowerError::new(
                form,
                format!("`{lisp}` and `{owner}` both translate to Go name `{go}`"),
            ));
        }
        Ok(())
    }

    /// A symbol in value position.
    fn symbol(&self, name: &str, form: &SExpr) -> LowerResult<Expr> {
        for (lisp, go) in parts(name) {
            self.claim(lisp, &go, form)?;
        }
        Ok(symbol_expr(name))
    }

    /// If `expr` is a list headed by a registered symbol, its rule and arguments.
    fn special<'e>(&self, expr: &'e SExpr) -> LowerResult<Option<Special<'e>>> {
        let Node::List(items) = &expr.node else {
            return Ok(None);
        };
        let Some((head, args)) = items.split_first() else {
            return Ok(None);
        };
        let Some(name) = head.as_symbol() else {
            return Ok(None);
        };
        let Some((arity, form)) = self.registry.lookup(name) else {
            return Ok(None);
        };
        tracing::trace!(form = name, args = args.len(), "special form");
        if !arity.accepts(args.len()) {
            return Err(LowerError::new(
                expr,
                format!("`{name}` expects {arity}, got {}", args.len()),
            ));
        }
        Ok(Some(Special { form, name, args }))
    }

    fn top_level(&self, expr: &SExpr) -> LowerResult<TopLevel> {
        if let Some(Special { form, args, .. }) = self.special(expr)? {
            let decl = match form {
                Form::Package => Decl::Package(self.name(&args[0], expr)?),
                Form::Import => Decl::Import(self.import_paths(args, expr)?),
                Form::Def => Decl::Var {
                    name: self.name(&args[0], expr)?,
                    value: self.expr(&args[1])?,
                },
                Form::Defn => {
                    let (params, body) = self.function(&args[1..], expr)?;
                    Decl::Func {
                        name: self.name(&args[0], expr)?,
                        params,
                        body,
                    }
                }
                _ => return Ok(TopLevel::Stmt(self.stmt(expr)?)),
            };
            return Ok(TopLevel::Decl(decl));
        }
        Ok(TopLevel::Stmt(self.stmt(expr)?))
    }

    /// Lowers a form whose value is discarded.
    fn stmt(&self, expr: &SExpr) -> LowerResult<Stmt> {
        let Some(special) = self.special(expr)? else {
            return Ok(Stmt::Expr(self.expr(expr)?));
        };
        let args = special.args;
        let stmt = match special.form {
            Form::Package | Form::Import => {
                return Err(LowerError::new(
                    expr,
                    format!("`{}` is only allowed at top level", special.name),
                ))
            }
            Form::Def => Stmt::Define {
                name: self.name(&args[0], expr)?,
                value: self.expr(&args[1])?,
            },
            Form::Defn => {
                let (params, body) = self.function(&args[1..], expr)?;
                Stmt::Define {
                    name: self.name(&args[0], expr)?,
                    value: Expr::FuncLit { params, body },
                }
            }
            Form::Set => self.assign(args, expr)?,
            Form::If => Stmt::If {
                cond: self.expr(&args[0])?,
                then: self.branch(&args[1])?,
                els: args.get(2).map(|e| self.branch(e)).transpose()?,
            },
            Form::Do => Stmt::Block(self.stmts(args)?),
            Form::Let => {
                let mut body = self.bindings(&args[0], expr)?;
                body.extend(self.stmts(&args[1..])?);
                Stmt::Block(body)
            }
            _ => Stmt::Expr(self.expr(expr)?),
        };
        Ok(stmt)
    }

    /// A statement as the body of an `if` branch; blocks are not nested twice.
    fn branch(&self, expr: &SExpr) -> LowerResult<Vec<Stmt>> {
        Ok(match self.stmt(expr)? {
            Stmt::Block(body) => body,
            stmt => vec![stmt],
        })
    }

    fn stmts(&self, forms: &[SExpr]) -> LowerResult<Vec<Stmt>> {
        forms.iter().map(|f| self.stmt(f)).collect()
    }

    /// Lowers a form whose value is returned: always ends each path with a `return`.
    fn tail(&self, expr: &SExpr) -> LowerResult<Vec<Stmt>> {
        let Some(special) = self.special(expr)? else {
            return Ok(vec![Stmt::Return(self.expr(expr)?)]);
        };
        let args = special.args;
        let stmts = match special.form {
            Form::If => {
                let cond = self.expr(&args[0])?;
                let then = self.tail(&args[1])?;
                let els = match args.get(2) {
                    Some(e) => self.tail(e)?,
                    None => vec![Stmt::Return(Expr::nil())],
                };
                vec![Stmt::If {
                    cond,
                    then,
                    els: Some(els),
                }]
            }
            Form::Do => self.body(args)?,
            Form::Let => {
                let mut body = self.bindings(&args[0], expr)?;
                body.extend(self.body(&args[1..])?);
                body
            }
            Form::Def | Form::Defn | Form::Set | Form::Package | Form::Import => {
                vec![self.stmt(expr)?, Stmt::Return(Expr::nil())]
            }
            _ => vec![Stmt::Return(self.expr(expr)?)],
        };
        Ok(stmts)
    }

    /// A function body: statements, then the last form in tail position.
    fn body(&self, forms: &[SExpr]) -> LowerResult<Vec<Stmt>> {
        let Some((last, init)) = forms.split_last() else {
            return Ok(vec![Stmt::Return(Expr::nil())]);
        };
        let mut stmts = self.stmts(init)?;
        stmts.extend(self.tail(last)?);
        Ok(stmts)
    }

    /// Lowers a form whose value is used.
    fn expr(&self, expr: &SExpr) -> LowerResult<Expr> {
        match &expr.node {
            Node::Atom(atom) => self.atom(atom, expr),
            Node::Vector(items) => Ok(Expr::CompositeLit {
                ty: quote::SEQUENCE_TYPE.to_owned(),
                elts: self.exprs(items)?,
            }),
            Node::Quoted(kind, inner) => self.quoted(*kind, inner, expr),
            Node::List(items) => {
                // `()` is nil.
                let Some((head, rest)) = items.split_first() else {
                    return Ok(Expr::nil());
                };
                // Anything unregistered is a call: `(f a b)` is `f(a, b)`.
                let Some(special) = self.special(expr)? else {
                    return Ok(Expr::call(self.expr(head)?, self.exprs(rest)?));
                };
                let args = special.args;
                match special.form {
                    Form::Fn => {
                        let (params, body) = self.function(args, expr)?;
                        Ok(Expr::FuncLit { params, body })
                    }
                    Form::If | Form::Do | Form::Let => Ok(Expr::call(
                        Expr::FuncLit {
                            params: vec![],
                            body: self.tail(expr)?,
                        },
                        vec![],
                    )),
                    Form::Quote(kind) => self.quoted(kind, &args[0], expr),
                    Form::Binary(op) => self.fold(op, args),
                    Form::Minus if args.len() == 1 => {
                        Ok(Expr::unary(UnaryOp::Neg, self.expr(&args[0])?))
                    }
                    Form::Minus => self.fold(BinaryOp::Sub, args),
                    Form::Not => Ok(Expr::unary(UnaryOp::Not, self.expr(&args[0])?)),
                    Form::Package | Form::Import | Form::Def | Form::Defn | Form::Set => {
                        Err(LowerError::new(
                            expr,
                            format!("`{}` cannot be used as a value", special.name),
                        ))
                    }
                }
            }
        }
    }

    fn exprs(&self, forms: &[SExpr]) -> LowerResult<Vec<Expr>> {
        forms.iter().map(|f| self.expr(f)).collect()
    }

    /// `(+ a b c)` is `a + b + c`; nested operators keep their parentheses.
    fn fold(&self, op: BinaryOp, args: &[SExpr]) -> LowerResult<Expr> {
        let mut operands = self.exprs(args)?.into_iter();
        let first = operands.next().map(Expr::operand).unwrap_or_else(Expr::nil);
        Ok(operands.fold(first, |x, y| Expr::binary(op, x, y.operand())))
    }

    fn atom(&self, atom: &Atom, expr: &SExpr) -> LowerResult<Expr> {
        match atom {
            Atom::Symbol(name) => self.symbol(name, expr),
            // Lisp integers are decimal; `010` would be octal in Go.
            Atom::Int(text) => {
                let value = text.parse::<i64>().map_err(|e| {
                    LowerError::new(expr, format!("malformed integer literal: {e}"))
                })?;
                Ok(Expr::lit(LitKind::Int, value.to_string()))
            }
            Atom::Float(text) => match text.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Expr::lit(LitKind::Float, text.as_str())),
                Ok(_) => Err(LowerError::new(expr, "float literal out of range")),
                Err(e) => Err(LowerError::new(
                    expr,
                    format!("malformed float literal: {e}"),
                )),
            },
            Atom::Str(text) => Ok(Expr::string(&unescape(text))),
        }
    }

    /// A name in binding position: must be a symbol.
    fn name(&self, target: &SExpr, form: &SExpr) -> LowerResult<String> {
        let Some(name) = target.as_symbol() else {
            return Err(LowerError::new(
                form,
                format!("expected a name, found {target}"),
            ));
        };
        let go = mangle(name);
        self.claim(name, &go, form)?;
        Ok(go)
    }

    fn import_paths(&self, args: &[SExpr], form: &SExpr) -> LowerResult<Vec<String>> {
        args.iter()
            .map(|arg| match &arg.node {
                Node::Atom(Atom::Str(path)) => Ok(path.clone()),
                _ => Err(LowerError::new(
                    form,
                    format!("import paths must be strings, found {arg}"),
                )),
            })
            .collect()
    }

    /// `[params] body...`, shared by `fn` and `defn`.
    fn function(&self, args: &[SExpr], form: &SExpr) -> LowerResult<(Vec<String>, Vec<Stmt>)> {
        let Node::Vector(params) = &args[0].node else {
            return Err(LowerError::new(
                form,
                format!("parameters must be a vector, found {}", args[0]),
            ));
        };
        let params = params
            .iter()
            .map(|p| self.name(p, form))
            .collect::<LowerResult<Vec<_>>>()?;
        Ok((params, self.body(&args[1..])?))
    }

    /// `[a 1 b 2]` as `a := 1`, `b := 2`.
    fn bindings(&self, vector: &SExpr, form: &SExpr) -> LowerResult<Vec<Stmt>> {
        let Node::Vector(items) = &vector.node else {
            return Err(LowerError::new(
                form,
                format!("bindings must be a vector, found {vector}"),
            ));
        };
        if items.len() % 2 != 0 {
            return Err(LowerError::new(
                form,
                "bindings must come in name/value pairs",
            ));
        }
        items
            .chunks(2)
            .map(|pair| {
                Ok(Stmt::Define {
                    name: self.name(&pair[0], form)?,
                    value: self.expr(&pair[1])?,
                })
            })
            .collect()
    }

    fn assign(&self, args: &[SExpr], form: &SExpr) -> LowerResult<Stmt> {
        let Some(target) = args[0].as_symbol() else {
            return Err(LowerError::new(
                form,
                format!("can only assign to a name, found {}", args[0]),
            ));
        };
        Ok(Stmt::Assign {
            target: self.symbol(target, form)?,
            value: self.expr(&args[1])?,
        })
    }
}
