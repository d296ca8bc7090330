//! Tests for lowering: special forms, positions, and quoting.
use super::*;
use crate::printer::render;
use crate::reader::{read, DEFAULT_MAX_DEPTH};

fn lower_str(src: &str) -> LowerResult<Unit> {
    let forms = read(src, DEFAULT_MAX_DEPTH).unwrap();
    lower(&forms, &Registry::default())
}

/// Lower and render as Go.
fn go(src: &str) -> String {
    match lower_str(src) {
        Ok(unit) => render(&unit),
        Err(e) => panic!("unexpected lowering error for {src:?}: {e}"),
    }
}

fn lower_err(src: &str) -> LowerError {
    match lower_str(src) {
        Err(e) => e,
        Ok(unit) => panic!("unexpected lowering of {src:?}: {}", render(&unit)),
    }
}

#[test]
fn empty_input() {
    assert_eq!(lower_str("").unwrap(), Unit::default());
    assert_eq!(lower_str("; only a comment\n").unwrap(), Unit::default());
}

#[test]
fn hello_world() {
    let got = go(r#"
        (package main)
        (import "fmt")
        (defn main [] (fmt.Println "hello"))
        "#);
    let want = r#"package main

import "fmt"

func main() any {
	return fmt.Println("hello")
}
"#;
    assert_eq!(got, want);
}

#[test]
fn several_imports() {
    let got = go(r#"(import "fmt" "os")"#);
    assert_eq!(got, "import (\n\t\"fmt\"\n\t\"os\"\n)\n");
}

#[test]
fn calls_and_atoms() {
    assert_eq!(go("(f)"), "f()\n");
    assert_eq!(go("(f 1 2.5 \"s\\n\" x)"), "f(1, 2.5, \"s\\n\", x)\n");
    assert_eq!(go("(empty? xs)"), "empty_p(xs)\n");
    assert_eq!(go("((g 1) 2)"), "g(1)(2)\n");
    assert_eq!(go("()"), "nil\n");
    assert_eq!(go("[1 [2] x]"), "[]any{1, []any{2}, x}\n");
}

#[test]
fn operators() {
    assert_eq!(go("(def x (+ 1 2 3))"), "var x = 1 + 2 + 3\n");
    assert_eq!(go("(* (+ 1 2) 3)"), "(1 + 2) * 3\n");
    assert_eq!(go("(- a (- b c))"), "a - (b - c)\n");
    assert_eq!(go("(- x)"), "-x\n");
    assert_eq!(go("(not (= a b))"), "!(a == b)\n");
    assert_eq!(go("(and (< a b) (not= b c))"), "(a < b) && (b != c)\n");
}

#[test]
fn if_in_each_position() {
    // Statement: no else branch needed.
    assert_eq!(go("(if ok (println 1))"), "if ok {\n\tprintln(1)\n}\n");

    // Statement: `do` branches are flattened into the block.
    let got = go("(if ok (do (a) (b)) (c))");
    assert_eq!(got, "if ok {\n\ta()\n\tb()\n} else {\n\tc()\n}\n");

    // Expression: an immediately-invoked function.
    let got = go("(def y (if ok 1 2))");
    let want = "var y = func() any {
	if ok {
		return 1
	} else {
		return 2
	}
}()
";
    assert_eq!(got, want);

    // Tail: a missing else returns nil.
    let got = go("(defn f [x] (if x 1))");
    let want = "func f(x any) any {
	if x {
		return 1
	} else {
		return nil
	}
}
";
    assert_eq!(got, want);
}

#[test]
fn function_bodies() {
    let got = go("(defn f [a] (let [b (+ a 1)] (* b 2)))");
    assert_eq!(got, "func f(a any) any {\n\tb := a + 1\n\treturn b * 2\n}\n");

    let got = go("(defn f [] (def x 1) x)");
    assert_eq!(got, "func f() any {\n\tx := 1\n\treturn x\n}\n");

    let got = go("(defn inc! [] (set! n (+ n 1)))");
    assert_eq!(got, "func inc_bang() any {\n\tn = n + 1\n\treturn nil\n}\n");

    assert_eq!(go("(def g (fn []))"), "var g = func() any {\n\treturn nil\n}\n");
    assert_eq!(
        go("(def add (fn [a b] (+ a b)))"),
        "var add = func(a, b any) any {\n\treturn a + b\n}\n"
    );
}

#[test]
fn nested_defn_is_a_closure() {
    let got = go("(defn outer [] (defn inner [] 1) (inner))");
    let want = "func outer() any {
	inner := func() any {
		return 1
	}
	return inner()
}
";
    assert_eq!(got, want);
}

#[test]
fn do_and_let_as_values() {
    let got = go("(f (do (g) 1))");
    assert_eq!(got, "f(func() any {\n\tg()\n\treturn 1\n}())\n");

    let got = go("(f (let [a 1] a))");
    assert_eq!(got, "f(func() any {\n\ta := 1\n\treturn a\n}())\n");

    assert_eq!(go("(f (do))"), "f(func() any {\n\treturn nil\n}())\n");
}

#[test]
fn top_level_statements_stay_together() {
    let got = go("(def x 1) (set! x 2) (println x)");
    assert_eq!(got, "var x = 1\n\nx = 2\nprintln(x)\n");
}

#[test]
fn quote_sugar_matches_long_form() {
    assert_eq!(lower_str("'(a 1 \"s\")"), lower_str("(quote (a 1 \"s\"))"));
    assert_eq!(lower_str("`(a ,b)"), lower_str("(quasiquote (a (unquote b)))"));
    assert_eq!(go("'(a 1 \"s\")"), "[]any{Symbol(\"a\"), 1, \"s\"}\n");
    assert_eq!(go("'x"), "Symbol(\"x\")\n");
    assert_eq!(go("'[]"), "[]any{}\n");
}

#[test]
fn quoted_quote() {
    assert_eq!(
        go("''x"),
        "[]any{Symbol(\"quote\"), Symbol(\"x\")}\n"
    );
    // Nothing is evaluated inside a plain quote.
    assert_eq!(
        go("'(a ,b)"),
        "[]any{Symbol(\"a\"), []any{Symbol(\"unquote\"), Symbol(\"b\")}}\n"
    );
}

#[test]
fn quasiquote_and_splice() {
    assert_eq!(go("`(a ,b)"), "[]any{Symbol(\"a\"), b}\n");
    assert_eq!(go("`,(f 1)"), "f(1)\n");
    assert_eq!(
        go("`(a ,b ,@cs d)"),
        "append(append([]any{Symbol(\"a\"), b}, cs...), Symbol(\"d\"))\n"
    );
    assert_eq!(go("`(,@xs)"), "append([]any{}, xs...)\n");
    assert_eq!(go("`(,@xs ,@ys)"), "append(append([]any{}, xs...), ys...)\n");
    assert_eq!(
        go("`[1 (unquote-splice xs)]"),
        "append([]any{1}, xs...)\n"
    );
}

#[test]
fn nested_quasiquote() {
    let got = go("`(a `(b ,(c ,d)))");
    let want = concat!(
        "[]any{Symbol(\"a\"), []any{Symbol(\"quasiquote\"), ",
        "[]any{Symbol(\"b\"), []any{Symbol(\"unquote\"), []any{Symbol(\"c\"), d}}}}}\n"
    );
    assert_eq!(got, want);
}

#[test]
fn unquote_outside_quasiquote() {
    let e = lower_err(",x");
    assert_eq!(e.message, "unquote outside of quasiquote");
    assert_eq!(e.form, ",x");
    let e = lower_err("(f (unquote-splice xs))");
    assert_eq!(e.message, "unquote-splice outside of quasiquote");
    let e = lower_err("`,@xs");
    assert_eq!(e.message, "unquote-splice must appear inside a list");
}

#[test]
fn arity_is_checked() {
    let e = lower_err("(if)");
    assert_eq!(e.message, "`if` expects 2 to 3 arguments, got 0");
    assert_eq!(e.to_string(), "`if` expects 2 to 3 arguments, got 0: (if)");

    let e = lower_err("(def x)");
    assert_eq!(e.message, "`def` expects exactly 2 arguments, got 1");
    let e = lower_err("(quote a b)");
    assert_eq!(e.message, "`quote` expects exactly 1 argument, got 2");
    let e = lower_err("(+ 1)");
    assert_eq!(e.message, "`+` expects at least 2 arguments, got 1");
}

#[test]
fn error_points_at_offending_form() {
    let e = lower_err("(foo (if))");
    assert_eq!(e.pos, 5);
    assert_eq!(e.form, "(if)");
}

#[test]
fn first_error_aborts_unit() {
    // The valid forms around the bad one don't produce a partial unit.
    let e = lower_err("(f 1) (if) (g 2)");
    assert_eq!(e.pos, 6);
}

#[test]
fn malformed_forms() {
    let e = lower_err("(defn f [] (package x))");
    assert_eq!(e.message, "`package` is only allowed at top level");
    let e = lower_err("(f (def y 1))");
    assert_eq!(e.message, "`def` cannot be used as a value");
    let e = lower_err("(fn x)");
    assert_eq!(e.message, "parameters must be a vector, found x");
    let e = lower_err("(fn [1] 1)");
    assert_eq!(e.message, "expected a name, found 1");
    let e = lower_err("(let [a] a)");
    assert_eq!(e.message, "bindings must come in name/value pairs");
    let e = lower_err("(let (a 1) a)");
    assert_eq!(e.message, "bindings must be a vector, found (a 1)");
    let e = lower_err("(import fmt)");
    assert_eq!(e.message, "import paths must be strings, found fmt");
    let e = lower_err("(set! (f) 1)");
    assert_eq!(e.message, "can only assign to a name, found (f)");
}

#[test]
fn malformed_numerals() {
    let e = lower_err("99999999999999999999");
    assert!(
        e.message.starts_with("malformed integer literal"),
        "unexpected message: {}",
        e.message
    );
    assert_eq!(go("9223372036854775807"), "9223372036854775807\n");

    let huge = format!("{}.0", "9".repeat(400));
    let e = lower_err(&huge);
    assert_eq!(e.message, "float literal out of range");
}

#[test]
fn names_are_mangled() {
    assert_eq!(go("(def tree->list 1)"), "var tree__gtlist = 1\n");
    assert_eq!(go("(range xs)"), "range_(xs)\n");
    assert_eq!(go("(set! a.b 1)"), "a.b = 1\n");
}

#[test]
fn registry_is_consulted() {
    let forms = read("(if a b)", DEFAULT_MAX_DEPTH).unwrap();
    let unit = lower(&forms, &Registry::new(&[])).unwrap();
    assert_eq!(render(&unit), "if_(a, b)\n");
}

#[test]
fn lowering_is_deterministic() {
    let src = r#"
        (package main)
        (defn f [x] (let [y `(,x ,@x)] (if y (g y) 'done)))
        (f [1 2])
        "#;
    let forms = read(src, DEFAULT_MAX_DEPTH).unwrap();
    let registry = Registry::default();
    let first = lower(&forms, &registry).unwrap();
    let second = lower(&forms, &registry).unwrap();
    assert_eq!(first, second);
    assert_eq!(render(&first), render(&second));
}

#[test]
fn lowers_at_the_depth_limit() {
    let depth = DEFAULT_MAX_DEPTH;
    let calls = format!("{}x{}", "(f ".repeat(depth), ")".repeat(depth));
    assert!(go(&calls).starts_with("f(f(f("));

    // `def` is one level; the `if`s fill the rest.
    let ifs = format!("(def y {}1{})", "(if a ".repeat(depth - 1), ")".repeat(depth));
    assert!(go(&ifs).starts_with("var y = func() any {"));

    let quasi = format!("`{}x{}", "(".repeat(depth - 1), ")".repeat(depth - 1));
    assert!(go(&quasi).starts_with("[]any{[]any{"));
}

#[test]
fn deeper_trees_are_rejected() {
    let mut deep = SExpr::symbol("x", 0);
    for _ in 0..=DEFAULT_MAX_DEPTH {
        deep = SExpr::list(vec![SExpr::symbol("f", 0), deep], 0);
    }
    match lower(&[deep], &Registry::default()) {
        Err(e) => {
            assert_eq!(
                e.message,
                format!("nesting too deep: limit is {DEFAULT_MAX_DEPTH}")
            );
            assert_eq!(e.form, "(...)");
        }
        Ok(unit) => panic!("unexpected lowering: {unit:?}"),
    }

    let forms = read("(f (g))", DEFAULT_MAX_DEPTH).unwrap();
    assert!(lower_with_limit(&forms, &Registry::default(), 2).is_ok());
    match lower_with_limit(&forms, &Registry::default(), 1) {
        Err(e) => assert_eq!(e.message, "nesting too deep: limit is 1"),
        Ok(unit) => panic!("unexpected lowering: {unit:?}"),
    }
}

#[test]
fn integers_are_decimal() {
    assert_eq!(go("(f 010)"), "f(10)\n");
    assert_eq!(go("(f 08)"), "f(8)\n");
    assert_eq!(go("(f 0 000)"), "f(0, 0)\n");
    assert_eq!(go("'(007)"), "[]any{7}\n");
}

#[test]
fn nested_unary_operators() {
    assert_eq!(go("(- (- x))"), "-(-x)\n");
    assert_eq!(go("(- (- 1))"), "-(-1)\n");
    assert_eq!(go("(not (not ok))"), "!(!ok)\n");
    assert_eq!(go("(- (+ a b))"), "-(a + b)\n");
    assert_eq!(go("(+ (- a) b)"), "-a + b\n");
}

#[test]
fn strings_are_requoted() {
    assert_eq!(go("(f \"a\nb\")"), "f(\"a\\nb\")\n");
    assert_eq!(go(r#"(f "tab\there")"#), "f(\"tab\\there\")\n");
    assert_eq!(go(r#"(f "say \"hi\"")"#), "f(\"say \\\"hi\\\"\")\n");
    assert_eq!(go(r#"(f "\q" "a\\b")"#), "f(\"q\", \"a\\\\b\")\n");
    assert_eq!(go("(f \"λ\")"), "f(\"λ\")\n");
    assert_eq!(go("'(\"a\nb\")"), "[]any{\"a\\nb\"}\n");
}

#[test]
fn string_escapes() {
    assert_eq!(unescape(r#""""#), "");
    assert_eq!(unescape(r#""a\nb""#), "a\nb");
    assert_eq!(unescape(r#""\"\\\x""#), "\"\\x");
}

#[test]
fn colliding_names_are_rejected() {
    let e = lower_err("(def a-b 1) (def a_b 2)");
    assert_eq!(e.message, "`a_b` and `a-b` both translate to Go name `a_b`");
    assert_eq!(e.pos, 12);

    let e = lower_err("(f empty? empty_p)");
    assert_eq!(e.message, "`empty_p` and `empty?` both translate to Go name `empty_p`");

    let e = lower_err("(range_ range)");
    assert_eq!(e.message, "`range` and `range_` both translate to Go name `range_`");

    let e = lower_err("(set! x.a-b 1) (a_b)");
    assert_eq!(e.message, "`a_b` and `a-b` both translate to Go name `a_b`");
}

#[test]
fn repeated_and_quoted_names_are_fine() {
    assert_eq!(go("(def a-b 1) (f a-b a-b)"), "var a_b = 1\n\nf(a_b, a_b)\n");
    assert_eq!(go("(def a-b 'a_b)"), "var a_b = Symbol(\"a_b\")\n");
    // Each unit starts afresh.
    assert_eq!(go("(a-b)"), "a_b()\n");
    assert_eq!(go("(a_b)"), "a_b()\n");
}
