//! A Go-shaped syntax tree: what lowering produces and the printer consumes.
//!
//! This is deliberately a subset of Go. Values are untyped at this level;
//! function parameters and results are all `any`.

/// One translated input chunk: one item per top-level Lisp form, in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Unit {
    pub items: Vec<TopLevel>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TopLevel {
    Decl(Decl),
    Stmt(Stmt),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    /// `package main`
    Package(String),
    /// `import "fmt"`; paths are kept as quoted literals.
    Import(Vec<String>),
    /// `var x = v`
    Var { name: String, value: Expr },
    /// `func f(a, b any) any { ... }`
    Func {
        name: String,
        params: Vec<String>,
        body: Vec<Stmt>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    /// `x := v`
    Define { name: String, value: Expr },
    /// `x = v`
    Assign { target: Expr, value: Expr },
    Return(Expr),
    If {
        cond: Expr,
        then: Vec<Stmt>,
        els: Option<Vec<Stmt>>,
    },
    Block(Vec<Stmt>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Quo,
    Rem,
    Eql,
    Neq,
    Lss,
    Gtr,
    Leq,
    Geq,
    LAnd,
    LOr,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Quo => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eql => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Lss => "<",
            BinaryOp::Gtr => ">",
            BinaryOp::Leq => "<=",
            BinaryOp::Geq => ">=",
            BinaryOp::LAnd => "&&",
            BinaryOp::LOr => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    /// A literal; `value` is Go source text, e.g. `42` or `"hi"`.
    BasicLit { kind: LitKind, value: String },
    /// `x.sel`
    Selector { x: Box<Expr>, sel: String },
    /// `func(args)`, or `func(args...)` when `ellipsis` is set.
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        ellipsis: bool,
    },
    Binary {
        op: BinaryOp,
        x: Box<Expr>,
        y: Box<Expr>,
    },
    Unary { op: UnaryOp, x: Box<Expr> },
    Paren(Box<Expr>),
    /// `func(a, b any) any { ... }`
    FuncLit { params: Vec<String>, body: Vec<Stmt> },
    /// `ty{elts...}`, e.g. `[]any{1, 2}`
    CompositeLit { ty: String, elts: Vec<Expr> },
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn nil() -> Self {
        Expr::ident("nil")
    }

    pub fn lit(kind: LitKind, value: impl Into<String>) -> Self {
        Expr::BasicLit {
            kind,
            value: value.into(),
        }
    }

    /// A Go string literal holding `content`, escaped as needed.
    pub fn string(content: &str) -> Self {
        Expr::lit(LitKind::String, quote_go(content))
    }

    pub fn call(func: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            func: Box::new(func),
            args,
            ellipsis: false,
        }
    }

    pub fn binary(op: BinaryOp, x: Expr, y: Expr) -> Self {
        Expr::Binary {
            op,
            x: Box::new(x),
            y: Box::new(y),
        }
    }

    /// `op x`, parenthesizing `x` unless it binds tighter: `-(-x)` rather than `--x`.
    pub fn unary(op: UnaryOp, x: Expr) -> Self {
        let x = match x {
            Expr::Binary { .. } | Expr::Unary { .. } => Expr::Paren(Box::new(x)),
            other => other,
        };
        Expr::Unary { op, x: Box::new(x) }
    }

    /// Parenthesize binary expressions, so they can be used as operands.
    pub fn operand(self) -> Self {
        match self {
            Expr::Binary { .. } => Expr::Paren(Box::new(self)),
            other => other,
        }
    }
}

/// Quote `s` as an interpreted Go string literal.
pub fn quote_go(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
