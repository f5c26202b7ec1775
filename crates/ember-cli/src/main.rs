// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Ember CLI - file runner and front-end inspection.

mod commands;
mod help;
mod output;

use std::env;
use std::fs;
use std::process;

use ember_ast::{LineMap, Span};

/// Options accepted by `ember run`.
#[derive(Debug, Default)]
pub struct RunOptions {
    pub gc_threshold: Option<usize>,
    pub gc_stats: bool,
}

fn main() {
    output::init();
    init_tracing();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        help::print_usage();
        return;
    }

    match args[1].as_str() {
        "run" => {
            let (path, opts) = parse_run_args(&args[2..]);
            commands::run::cmd_run(&path, opts);
        }
        "lex" => commands::phase::cmd_lex(require_path(&args, "lex")),
        "parse" => commands::phase::cmd_parse(require_path(&args, "parse")),
        "help" | "--help" | "-h" => help::print_usage(),
        "version" | "--version" | "-V" => println!("ember {}", help::VERSION),
        other if other.ends_with(".em") => {
            let (path, opts) = parse_run_args(&args[1..]);
            commands::run::cmd_run(&path, opts);
        }
        other => {
            eprintln!("{}: unknown command `{}`", output::error_label(), other);
            eprintln!();
            help::print_usage();
            process::exit(1);
        }
    }
}

/// Install a log subscriber, but only when RUST_LOG asks for one, so
/// program output stays clean by default.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn usage_error(message: &str) -> ! {
    eprintln!("{}: {}", output::error_label(), message);
    process::exit(1);
}

fn require_path<'a>(args: &'a [String], cmd: &str) -> &'a str {
    match args.get(2) {
        Some(path) => path,
        None => usage_error(&format!("usage: ember {} <file>", cmd)),
    }
}

fn parse_run_args(args: &[String]) -> (String, RunOptions) {
    let mut opts = RunOptions::default();
    let mut path = None;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--gc-threshold" => {
                let value = iter
                    .next()
                    .unwrap_or_else(|| usage_error("--gc-threshold needs a value"));
                match value.parse::<usize>() {
                    Ok(n) => opts.gc_threshold = Some(n),
                    Err(_) => usage_error(&format!(
                        "--gc-threshold expects a non-negative integer, got `{}`",
                        value
                    )),
                }
            }
            "--gc-stats" => opts.gc_stats = true,
            flag if flag.starts_with("--") => usage_error(&format!("unknown option `{}`", flag)),
            file if path.is_none() => path = Some(file.to_string()),
            extra => usage_error(&format!("unexpected argument `{}`", extra)),
        }
    }

    match path {
        Some(path) => (path, opts),
        None => usage_error("usage: ember run [--gc-threshold N] [--gc-stats] <file>"),
    }
}

fn read_source(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: reading {}: {}", output::error_label(), output::file_path(path), e);
            process::exit(1);
        }
    }
}

/// Show an error with source context.
fn show_error(path: &str, source: &str, span: Span, message: &str, hint: Option<&str>) {
    let lines = LineMap::new(source);
    let (line, byte_col) = lines.line_col(span.start);
    let text = lines.line_text(source, line).unwrap_or("");
    let (col, width) = caret_position(text, byte_col, span.len());

    eprintln!();
    eprintln!("{}: {}", output::error_label(), message);
    eprintln!("  {} {}:{}:{}", output::error_arrow(), path, line, col);
    eprintln!("    {}", output::pipe());
    eprintln!("{} {} {}", output::line_number(line), output::pipe(), text);
    eprintln!("    {} {}{}", output::pipe(), " ".repeat(col - 1), output::carets(width));

    if let Some(hint) = hint {
        eprintln!("    {}", output::pipe());
        eprintln!("    {} {}: {}", output::hint_equals(), output::hint_label(), hint);
    }
}

/// Convert a 1-based byte column and byte length on `text` into a 1-based
/// character column and a character width clipped to the line.
fn caret_position(text: &str, byte_col: usize, byte_len: usize) -> (usize, usize) {
    let start = (byte_col - 1).min(text.len());
    let end = start.saturating_add(byte_len).min(text.len());
    let col = text.get(..start).map_or(start, |before| before.chars().count()) + 1;
    let width = text.get(start..end).map_or(0, |span| span.chars().count());
    (col, width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_position_ascii() {
        let text = "print 1 + x;";
        assert_eq!(caret_position(text, 7, 5), (7, 5));
        assert_eq!(caret_position(text, 1, 0), (1, 0));
    }

    #[test]
    fn caret_position_counts_characters() {
        let text = "print \"é\" + 1;";
        // `"é" + 1` is 8 bytes but 7 characters.
        assert_eq!(caret_position(text, 7, 8), (7, 7));
        // The `1` after the two-byte `é`.
        let one = text.find('1').map(|i| i + 1).unwrap();
        assert_eq!(caret_position(text, one, 1), (13, 1));
    }

    #[test]
    fn caret_position_clips_to_the_line() {
        let text = "var s = \"ab";
        assert_eq!(caret_position(text, 9, 20), (9, 3));
        assert_eq!(caret_position(text, 40, 1), (12, 0));
    }
}
