// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Front-end commands: lex, parse.

use std::process;

use colored::Colorize;
use ember_ast::stmt::Stmt;
use ember_ast::{LineMap, Span};

use crate::{output, read_source, show_error};

pub fn cmd_lex(path: &str) {
    let source = read_source(path);
    let result = ember_lexer::Lexer::new(&source).tokenize();

    for error in &result.errors {
        show_error(path, &source, error.span, &error.message, error.hint.as_deref());
    }

    if !result.is_ok() {
        eprintln!("\n{}", output::banner_fail("Lex", result.errors.len()));
        process::exit(1);
    }

    println!("{} Tokens ({}) {}\n", "===".dimmed(), result.tokens.len(), "===".dimmed());
    let lines = LineMap::new(&source);
    for tok in &result.tokens {
        let (line, col) = lines.line_col(tok.span.start);
        println!("{:4}:{:<3} {:?}", line, col, tok.kind);
    }
    println!("\n{}", output::banner_ok(&format!("Lex: {} tokens", result.tokens.len())));
}

pub fn cmd_parse(path: &str) {
    let source = read_source(path);
    let Some(stmts) = frontend(path, &source) else {
        process::exit(1);
    };

    println!("{} Statements ({}) {}\n", "===".dimmed(), stmts.len(), "===".dimmed());
    for (i, stmt) in stmts.iter().enumerate() {
        println!("--- {} {} ---", i + 1, stmt.kind.describe());
        println!("{:#?}", stmt);
        println!();
    }
    println!("{}", output::banner_ok("Parse"));
}

/// Lex and parse `source`, reporting every error. Returns `None` if there
/// were any.
pub fn frontend(path: &str, source: &str) -> Option<Vec<Stmt>> {
    let lex_result = ember_lexer::Lexer::new(source).tokenize();
    let mut reported = report_per_line(path, source, lex_result.errors.iter().map(|e| {
        (e.span, e.message.as_str(), e.hint.as_deref())
    }));

    let parse_result = ember_parser::Parser::new(lex_result.tokens).parse();
    reported += report_per_line(path, source, parse_result.errors.iter().map(|e| {
        (e.span, e.message.as_str(), e.hint.as_deref())
    }));

    if reported > 0 {
        eprintln!("\n{}", output::banner_fail("Parse", reported));
        return None;
    }
    Some(parse_result.stmts)
}

/// Show at most one error per source line; later errors on the same line
/// are usually cascades of the first.
fn report_per_line<'a>(
    path: &str,
    source: &str,
    errors: impl Iterator<Item = (Span, &'a str, Option<&'a str>)>,
) -> usize {
    let lines = LineMap::new(source);
    let mut last_line = None;
    let mut shown = 0;
    for (span, message, hint) in errors {
        let (line, _) = lines.line_col(span.start);
        if last_line != Some(line) {
            show_error(path, source, span, message, hint);
            last_line = Some(line);
            shown += 1;
        }
    }
    shown
}
