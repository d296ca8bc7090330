//! Interactive translation, one form (or a few) at a time.

use std::io::{self, BufRead, Write};

use crate::{run, Options};

const PROMPT: &str = ">> ";
/// Shown while the input so far is an incomplete form.
const CONTINUE: &str = ".. ";
const QUIT: &str = ":quit";

/// Run a read-translate-print loop until end of input or `:quit`.
///
/// Output and prompts go to `output`; diagnostics to `errors`.
/// Input that ends mid-form (an open bracket, an unterminated string) is held,
/// and the next line is appended to it.
pub fn repl(
    input: &mut impl BufRead,
    output: &mut impl Write,
    errors: &mut impl Write,
    options: &Options,
) -> io::Result<()> {
    let mut pending = String::new();
    loop {
        output.write_all(if pending.is_empty() { PROMPT } else { CONTINUE }.as_bytes())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // Whatever is held can't be completed any more.
            if let Err(e) = run(&pending, options) {
                writeln!(errors, "{}", e.diagnostic(&pending))?;
            }
            return Ok(());
        }
        if pending.is_empty() && line.trim() == QUIT {
            return Ok(());
        }
        pending.push_str(&line);

        match run(&pending, options) {
            Ok(out) => output.write_all(out.as_bytes())?,
            Err(e) if e.is_incomplete() => {
                tracing::debug!(error = %e, "incomplete input, reading more");
                continue;
            }
            Err(e) => writeln!(errors, "{}", e.diagnostic(&pending))?,
        }
        pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Emit;

    /// Run a session; returns (output, errors).
    fn session(input: &str, options: &Options) -> (String, String) {
        let mut output = Vec::new();
        let mut errors = Vec::new();
        repl(&mut input.as_bytes(), &mut output, &mut errors, options).unwrap();
        (
            String::from_utf8(output).unwrap(),
            String::from_utf8(errors).unwrap(),
        )
    }

    #[test]
    fn translates_each_line() {
        let (out, err) = session("(f 1)\n(def x 2)\n", &Options::default());
        assert_eq!(out, ">> f(1)\n>> var x = 2\n>> ");
        assert_eq!(err, "");
    }

    #[test]
    fn continues_incomplete_forms() {
        let (out, err) = session("(f 1\n  2)\n\"a\n b\"\n", &Options::default());
        assert_eq!(out, ">> .. f(1, 2)\n>> .. \"a\\n b\"\n>> ");
        assert_eq!(err, "");
    }

    #[test]
    fn reports_errors_and_keeps_going() {
        let (out, err) = session("(f))\n(if)\n(g)\n", &Options::default());
        assert_eq!(out, ">> >> >> g()\n>> ");
        let lines: Vec<_> = err.lines().collect();
        assert_eq!(
            lines,
            [
                "line 1 column 4: lex error: unexpected close paren",
                "line 1 column 1: lower error: `if` expects 2 to 3 arguments, got 0: (if)",
            ]
        );
    }

    #[test]
    fn quit_and_eof() {
        let (out, err) = session(":quit\n(f)\n", &Options::default());
        assert_eq!(out, ">> ");
        assert_eq!(err, "");

        // End of input in the middle of a form reports it.
        let (out, err) = session("(f [1\n", &Options::default());
        assert_eq!(out, ">> .. ");
        assert_eq!(err, "line 1 column 4: lex error: unclosed bracket\n");
    }

    #[test]
    fn blank_lines_are_quiet() {
        let (out, err) = session("\n; comment\n", &Options::default());
        assert_eq!(out, ">> >> >> ");
        assert_eq!(err, "");
    }

    #[test]
    fn honors_emit() {
        let options = Options {
            emit: Emit::Sexpr,
            ..Options::default()
        };
        let (out, _) = session("(a   'b)\n", &options);
        assert_eq!(out, ">> (a 'b)\n>> ");
    }
}
