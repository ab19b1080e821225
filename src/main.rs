//! NahualScript CLI
//!
//! Command-line interface for the NahualScript interpreter.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process;

use nahual::{Diagnostic, Interpreter, InterpreterConfig, Lexer, VERSION};

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut show_tokens = false;
    let mut show_help = false;
    let mut debug = false;
    let mut filename: Option<&String> = None;

    for arg in &args[1..] {
        match arg.as_str() {
            "--tokens" | "-t" => show_tokens = true,
            "--help" | "-h" => show_help = true,
            "--debug" | "-d" => debug = true,
            _ if arg.starts_with('-') => {
                eprintln!("Unknown flag: {}", arg);
                print_usage();
                process::exit(1);
            }
            _ => filename = Some(arg),
        }
    }

    if show_help {
        print_help();
        return;
    }

    init_tracing(debug);

    match filename {
        Some(file) if show_tokens => {
            if let Err(e) = show_file_tokens(file) {
                eprintln!("{}", e);
                process::exit(1);
            }
        }
        Some(file) => {
            if let Err(e) = run_file(file, debug) {
                eprintln!("{}", e);
                process::exit(1);
            }
        }
        None if show_tokens => {
            eprintln!("Error: --tokens needs an input file");
            print_usage();
            process::exit(1);
        }
        None => {
            println!("NahualScript v{} - Interpreter", VERSION);
            println!("Type 'salir' to quit\n");
            repl(debug);
        }
    }
}

/// `RUST_LOG` wins; otherwise `--debug` turns on debug-level events.
fn init_tracing(debug: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true).with_level(true))
        .with(filter)
        .init();
}

fn print_usage() {
    eprintln!("Usage: nahual [OPTIONS] [script]");
    eprintln!("       nahual --help");
}

fn print_help() {
    println!("NahualScript v{} - A small interpreted language", VERSION);
    println!();
    println!("USAGE:");
    println!("    nahual [OPTIONS] [script]");
    println!();
    println!("OPTIONS:");
    println!("    -t, --tokens    Show tokenization output (lexer only)");
    println!("    -d, --debug     Verbose diagnostics and debug logging");
    println!("    -h, --help      Show this help message");
    println!();
    println!("EXAMPLES:");
    println!("    nahual demos/factorial.nhl           Run a script");
    println!("    nahual --tokens demos/factorial.nhl  Show tokens from lexer");
    println!("    nahual                               Start interactive REPL");
}

/// Run a NahualScript file
fn run_file(filename: &str, debug: bool) -> Result<(), String> {
    let source = fs::read_to_string(filename)
        .map_err(|e| format!("Failed to read file '{}': {}", filename, e))?;

    let mut interpreter = Interpreter::with_config(InterpreterConfig {
        debug,
        filename: Some(filename.to_string()),
        ..InterpreterConfig::default()
    });

    interpreter
        .run(&source)
        .map(|_| ())
        .map_err(|diagnostic| diagnostic.format())
}

/// Show tokens from lexing a file
fn show_file_tokens(filename: &str) -> Result<(), String> {
    let source = fs::read_to_string(filename)
        .map_err(|e| format!("Failed to read file '{}': {}", filename, e))?;

    let mut lexer = Lexer::new(&source, Some(filename));
    let tokens = lexer.tokenize();

    println!("Tokens for '{}':", filename);
    println!("{}", "=".repeat(60));

    for (i, token) in tokens.iter().enumerate() {
        println!(
            "{:4}: {:20} | {:?} @ {}",
            i,
            format!("{:?}", token.token_type),
            token.lexeme,
            token.location
        );
    }

    println!("{}", "=".repeat(60));
    println!("Total tokens: {}", tokens.len());

    let errors = lexer.into_errors();
    let count = errors.len();
    errors.into_result().map_err(|error| {
        format!(
            "{}\n{} lexical error(s)",
            Diagnostic::with_source(error, &source).format(),
            count
        )
    })
}

/// Start an interactive REPL (Read-Eval-Print Loop)
///
/// One interpreter serves the whole session so declarations persist. Lines are
/// collected until every `{` is closed, so functions and loops can span lines.
fn repl(debug: bool) {
    let mut interpreter = Interpreter::with_config(InterpreterConfig {
        debug,
        filename: Some("<repl>".to_string()),
        ..InterpreterConfig::default()
    });
    let mut line_number = 1;
    let mut pending = String::new();

    loop {
        if pending.is_empty() {
            print!("nahual:{} > ", line_number);
        } else {
            print!("nahual:{} . ", line_number);
        }
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break, // EOF
            Ok(_) => {
                let line = input.trim();

                if pending.is_empty() {
                    if line == "salir" || line == "exit" {
                        break;
                    }
                    if line.is_empty() {
                        continue;
                    }
                }

                pending.push_str(line);
                pending.push('\n');
                if open_braces(&pending) > 0 {
                    continue;
                }

                if let Err(diagnostic) = interpreter.run(&pending) {
                    eprintln!("{}", diagnostic);
                }

                pending.clear();
                line_number += 1;
            }
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }
    }

    println!("\nHasta pronto!");
}

/// Number of `{` not yet closed, ignoring braces in strings and comments
fn open_braces(source: &str) -> i64 {
    let mut depth = 0;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            '"' => {
                for c in chars.by_ref() {
                    if c == '"' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut previous = '\0';
                for c in chars.by_ref() {
                    if previous == '*' && c == '/' {
                        break;
                    }
                    previous = c;
                }
            }
            _ => {}
        }
    }

    depth
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_open_braces_counts_unclosed_blocks() {
        assert_eq!(open_braces("invocar 1;"), 0);
        assert_eq!(open_braces("sabiduria f(espiritu n) {\n"), 1);
        assert_eq!(open_braces("sabiduria f(espiritu n) {\nvision (n igual 0) {\n"), 2);
        assert_eq!(open_braces("sabiduria f() {\nretornar 1;\n}\n"), 0);
    }

    #[test]
    fn test_open_braces_ignores_strings_and_comments() {
        assert_eq!(open_braces("invocar \"{\";"), 0);
        assert_eq!(open_braces("invocar \"}\", \"{\";"), 0);
        assert_eq!(open_braces("ritual (cierto) { // }\n"), 1);
        assert_eq!(open_braces("/* { */ invocar 1;"), 0);
    }

    #[test]
    fn test_stray_closing_brace_is_submitted() {
        assert!(open_braces("}\n") <= 0);
    }
}
