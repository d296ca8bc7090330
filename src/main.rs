//! Translate Lisp into Go.
//!
//! With a file, translates it once and prints the result:
//!
//! ```ignore
//! gisp hello.lisp >hello.go
//! ```
//!
//! Without one, starts an interactive session on stdin.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gisp::{Emit, Options};
use tracing::Level;

#[derive(Parser)]
#[command(name = "gisp")]
#[command(about = "Lisp syntax for Go", long_about = None)]
#[command(version)]
struct Cli {
    /// Source file to translate; reads interactively from stdin if absent
    file: Option<PathBuf>,

    /// Deepest nesting of brackets and quotes to accept
    #[arg(long, default_value_t = gisp::reader::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// What to print
    #[arg(long, value_enum, default_value_t = Emit::Go)]
    emit: Emit,

    /// Log more; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let options = Options {
        max_depth: cli.max_depth,
        emit: cli.emit,
    };

    let Some(path) = cli.file else {
        let mut stdin = std::io::stdin().lock();
        let mut stdout = std::io::stdout().lock();
        let mut stderr = std::io::stderr().lock();
        return match gisp::repl(&mut stdin, &mut stdout, &mut stderr, &options) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        };
    };

    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: could not read {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(path = %path.display(), bytes = source.len(), "translating");
    match gisp::run(&source, &options) {
        Ok(out) => {
            print!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", path.display(), e.diagnostic(&source));
            ExitCode::FAILURE
        }
    }
}
