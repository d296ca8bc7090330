//! Render an unlowered Lisp tree as Graphviz.
//!
//! Usage:
//!
//! ```ignore
//! <input.lisp lisp_to_graphviz | dot -T png >output.png
//! ```

use std::io::{Read, Write};

use gisp::reader::DEFAULT_MAX_DEPTH;
use tracing::Level;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let mut input = std::io::stdin().lock();
    let mut s = String::new();
    input
        .read_to_string(&mut s)
        .expect("error: could not read input as UTF-8");

    let forms = match gisp::reader::read(&s, DEFAULT_MAX_DEPTH) {
        Ok(forms) => forms,
        Err(e) => {
            eprintln!("error: {}", gisp::Error::from(e).diagnostic(&s));
            std::process::exit(1);
        }
    };
    tracing::debug!(forms = forms.len(), "rendering");

    std::io::stdout()
        .lock()
        .write_all(&gisp::graphviz::render_tree(&forms))
        .expect("error: could not write output");
}
