use crate::config::Config;
use crate::error::ErrorKind;
use std::io::{self, BufRead, Write};

/// Runs the REPL on stdin/stdout.
pub fn start(config: &Config) {
    println!("Nexus Interpreter v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'exit' or press Ctrl+D to quit");
    println!();

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(error) = run(stdin.lock(), stdout.lock(), config) {
        eprintln!("Error reading input: {}", error);
    }
}

/// Reads lines from `input` until EOF or `exit`/`quit`, writing results to `output`.
///
/// Every line is lexed, parsed and evaluated on its own; nothing carries
/// over from one line to the next.
pub fn run<R: BufRead, W: Write>(mut input: R, mut output: W, config: &Config) -> io::Result<()> {
    loop {
        write!(output, "{}", config.prompt)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(());
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            return Ok(());
        }

        run_line(line, &mut output, config)?;
    }
}

fn run_line<W: Write>(source: &str, output: &mut W, config: &Config) -> io::Result<()> {
    match crate::interpret(source, config) {
        Ok(Some(value)) => writeln!(output, "{}", value),
        Ok(None) => Ok(()),
        Err(errors) => {
            for error in errors {
                match error.kind {
                    ErrorKind::ParseError => writeln!(output, "\t{}", error.message)?,
                    ErrorKind::RuntimeError => writeln!(output, "\tRuntime error: {}", error.message)?,
                }
            }
            Ok(())
        }
    }
}
