// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Fix-it hints for "expected X" parse errors.

use ember_ast::token::TokenKind;

/// Hint for an "expected X, found Y" error.
pub fn for_expected(expected: &str, found: &TokenKind) -> Option<&'static str> {
    match (expected, found) {
        ("';'", TokenKind::Eof) => Some("the last statement is missing its ';'"),
        ("';'", _) => Some("end every statement with ';'"),

        ("'{'", _) => Some("blocks start with '{'"),
        ("'}'", TokenKind::Eof) => Some("every '{' needs a matching '}'"),
        ("'}'", _) => None,

        ("'('", TokenKind::Semi) => Some("write `new Name()` with empty parentheses"),
        ("'('", _) => None,
        ("')'", TokenKind::Eof) => Some("add ')' to close the parenthesis"),
        ("')'", _) => None,

        ("expression", TokenKind::Semi) => Some("statement is incomplete"),
        ("expression", TokenKind::Eq) => Some("put a variable or field on the left of '='"),
        ("expression", _) => Some("try a value, a variable, or `new Name()`"),

        ("a name", TokenKind::Number(_)) => Some("names can't start with a number"),
        ("a name", _) => Some("names start with a letter or '_'"),

        _ => None,
    }
}
