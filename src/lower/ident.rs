//! Turning Lisp symbols into Go identifiers.
//!
//! Lisp symbols allow characters Go doesn't (`tree->list`, `empty?`).
//! Those are spelled out; `fmt.Println` becomes a selector.

use std::fmt::Write;

use crate::goast::Expr;

mod regex {
    use regex::Regex;
    use std::sync::OnceLock;

    pub(super) fn go_ident() -> &'static Regex {
        static MATCH: OnceLock<Regex> = OnceLock::new();
        MATCH.get_or_init(|| {
            Regex::new(r"\A[\p{L}_][\p{L}\p{Nd}_]*\z")
                .expect("could not compile regex for Go identifier")
        })
    }

    /// `a.b.c`, with no empty segments.
    pub(super) fn dotted() -> &'static Regex {
        static MATCH: OnceLock<Regex> = OnceLock::new();
        MATCH.get_or_init(|| {
            Regex::new(r"\A[^.]+(\.[^.]+)+\z").expect("could not compile regex for dotted symbol")
        })
    }
}

const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Spell a symbol as a valid Go identifier.
///
/// Distinct symbols can share a spelling (`a-b` and `a_b`); lowering rejects a unit that uses both.
pub fn mangle(name: &str) -> String {
    if regex::go_ident().is_match(name) {
        return if KEYWORDS.contains(&name) {
            format!("{name}_")
        } else {
            name.to_owned()
        };
    }

    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let spelled = match c {
            c if c.is_alphabetic() || c.is_ascii_digit() || c == '_' => {
                out.push(c);
                continue;
            }
            '-' => "_",
            '?' => "_p",
            '!' => "_bang",
            '*' => "_star",
            '+' => "_plus",
            '<' => "_lt",
            '>' => "_gt",
            '=' => "_eq",
            '/' => "_slash",
            '%' => "_pct",
            '&' => "_amp",
            '.' => "_dot",
            ':' => "_colon",
            '$' => "_dollar",
            c => {
                let _ = write!(out, "_u{:04x}", c as u32);
                continue;
            }
        };
        out.push_str(spelled);
    }
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Each dot-separated part of a symbol with its Go spelling.
/// A symbol that isn't a dotted name is a single part.
pub fn parts(name: &str) -> Vec<(&str, String)> {
    if regex::dotted().is_match(name) {
        name.split('.').map(|part| (part, mangle(part))).collect()
    } else {
        vec![(name, mangle(name))]
    }
}

/// A symbol in value position: an identifier, or a selector chain for dotted names.
pub fn symbol_expr(name: &str) -> Expr {
    let mut spelled = parts(name).into_iter().map(|(_, go)| go);
    let first = spelled.next().unwrap_or_default();
    spelled.fold(Expr::Ident(first), |x, sel| Expr::Selector {
        x: Box::new(x),
        sel,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names_pass_through() {
        for name in ["x", "fooBar", "_tmp", "über", "x2"] {
            assert_eq!(mangle(name), name);
        }
    }

    #[test]
    fn lisp_names_are_spelled_out() {
        assert_eq!(mangle("tree->list"), "tree__gtlist");
        assert_eq!(mangle("empty?"), "empty_p");
        assert_eq!(mangle("set-x!"), "set_x_bang");
        assert_eq!(mangle("*earmuffs*"), "_starearmuffs_star");
        assert_eq!(mangle("-5"), "_5");
        assert_eq!(mangle("a→b"), "a_u2192b");
    }

    #[test]
    fn keywords_get_suffix() {
        assert_eq!(mangle("func"), "func_");
        assert_eq!(mangle("range"), "range_");
    }

    #[test]
    fn dotted_names_are_selectors() {
        assert_eq!(
            symbol_expr("fmt.Println"),
            Expr::Selector {
                x: Box::new(Expr::ident("fmt")),
                sel: "Println".into(),
            }
        );
        assert_eq!(
            symbol_expr("a.b.c"),
            Expr::Selector {
                x: Box::new(Expr::Selector {
                    x: Box::new(Expr::ident("a")),
                    sel: "b".into(),
                }),
                sel: "c".into(),
            }
        );
        assert_eq!(
            parts("fmt.Print-ln"),
            vec![("fmt", "fmt".to_owned()), ("Print-ln", "Print_ln".to_owned())]
        );
        // Not a selector: leading, trailing, or doubled dots.
        assert_eq!(symbol_expr(".x"), Expr::ident("_dotx"));
        assert_eq!(symbol_expr("..."), Expr::ident("_dot_dot_dot"));
    }
}
