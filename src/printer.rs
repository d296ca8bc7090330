//! Render a [`Unit`] as Go source text, in the layout `gofmt` would use.

use crate::goast::{Decl, Expr, Stmt, TopLevel, Unit};

/// Render the unit. Total: every unit has a rendering.
pub fn render(unit: &Unit) -> String {
    let mut printer = Printer::default();
    let mut previous: Option<&TopLevel> = None;
    for item in &unit.items {
        match (previous, item) {
            (None, _) => (),
            // Runs of statements stay together; declarations get a blank line.
            (Some(TopLevel::Stmt(_)), TopLevel::Stmt(_)) => printer.out.push('\n'),
            _ => printer.out.push_str("\n\n"),
        }
        match item {
            TopLevel::Decl(decl) => printer.decl(decl),
            TopLevel::Stmt(stmt) => printer.stmt(stmt),
        }
        previous = Some(item);
    }
    if !unit.items.is_empty() {
        printer.out.push('\n');
    }
    printer.out
}

#[derive(Default)]
struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push('\t');
        }
    }

    fn decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Package(name) => {
                self.out.push_str("package ");
                self.out.push_str(name);
            }
            Decl::Import(paths) => match paths.as_slice() {
                [single] => {
                    self.out.push_str("import ");
                    self.out.push_str(single);
                }
                many => {
                    self.out.push_str("import (");
                    self.indent += 1;
                    for path in many {
                        self.newline();
                        self.out.push_str(path);
                    }
                    self.indent -= 1;
                    self.newline();
                    self.out.push(')');
                }
            },
            Decl::Var { name, value } => {
                self.out.push_str("var ");
                self.out.push_str(name);
                self.out.push_str(" = ");
                self.expr(value);
            }
            Decl::Func { name, params, body } => {
                self.out.push_str("func ");
                self.out.push_str(name);
                self.signature(params);
                self.block(body);
            }
        }
    }

    /// `(a, b any) any `
    fn signature(&mut self, params: &[String]) {
        self.out.push('(');
        if !params.is_empty() {
            self.out.push_str(&params.join(", "));
            self.out.push_str(" any");
        }
        self.out.push_str(") any ");
    }

    /// `{ ... }` with the statements indented one level.
    fn block(&mut self, body: &[Stmt]) {
        self.out.push('{');
        self.indent += 1;
        for stmt in body {
            self.newline();
            self.stmt(stmt);
        }
        self.indent -= 1;
        self.newline();
        self.out.push('}');
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(e) => self.expr(e),
            Stmt::Define { name, value } => {
                self.out.push_str(name);
                self.out.push_str(" := ");
                self.expr(value);
            }
            Stmt::Assign { target, value } => {
                self.expr(target);
                self.out.push_str(" = ");
                self.expr(value);
            }
            Stmt::Return(e) => {
                self.out.push_str("return ");
                self.expr(e);
            }
            Stmt::If { cond, then, els } => {
                self.out.push_str("if ");
                self.expr(cond);
                self.out.push(' ');
                self.block(then);
                if let Some(els) = els {
                    self.out.push_str(" else ");
                    self.block(els);
                }
            }
            Stmt::Block(body) => self.block(body),
        }
    }

    fn list(&mut self, exprs: &[Expr]) {
        for (i, e) in exprs.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.expr(e);
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(name) => self.out.push_str(name),
            Expr::BasicLit { value, .. } => self.out.push_str(value),
            Expr::Selector { x, sel } => {
                self.expr(x);
                self.out.push('.');
                self.out.push_str(sel);
            }
            Expr::Call {
                func,
                args,
                ellipsis,
            } => {
                self.expr(func);
                self.out.push('(');
                self.list(args);
                if *ellipsis {
                    self.out.push_str("...");
                }
                self.out.push(')');
            }
            Expr::Binary { op, x, y } => {
                self.expr(x);
                self.out.push(' ');
                self.out.push_str(op.as_str());
                self.out.push(' ');
                self.expr(y);
            }
            Expr::Unary { op, x } => {
                self.out.push_str(op.as_str());
                self.expr(x);
            }
            Expr::Paren(inner) => {
                self.out.push('(');
                self.expr(inner);
                self.out.push(')');
            }
            Expr::FuncLit { params, body } => {
                self.out.push_str("func");
                self.signature(params);
                self.block(body);
            }
            Expr::CompositeLit { ty, elts } => {
                self.out.push_str(ty);
                self.out.push('{');
                self.list(elts);
                self.out.push('}');
            }
        }
    }
}
