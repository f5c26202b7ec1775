// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The lexer implementation using logos.

use ember_ast::token::{Token, TokenKind};
use ember_ast::Span;
use logos::Logos;

/// Raw token type for logos; literal values are decoded in a second pass.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    // === Keywords ===
    #[token("class")]
    Class,
    #[token("else")]
    Else,
    #[token("false")]
    False,
    #[token("fun")]
    Fun,
    #[token("if")]
    If,
    #[token("null")]
    Null,
    #[token("print")]
    Print,
    #[token("return")]
    Return,
    #[token("super")]
    Super,
    #[token("this")]
    This,
    #[token("true")]
    True,
    #[token("var")]
    Var,
    #[token("while")]
    While,
    #[token("new")]
    New,
    #[token("extends")]
    Extends,

    // === Operators ===
    #[token("!=")]
    BangEq,
    #[token("==")]
    EqEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("!")]
    Bang,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(".")]
    Dot,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,

    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    // === Literals ===
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    // Strings may span lines.
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    // Same shape without the closing quote; only wins when the string never closes.
    #[regex(r#""([^"\\]|\\.)*"#)]
    UnterminatedString,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// The lexer for Ember source code.
pub struct Lexer<'a> {
    source: &'a str,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, errors: Vec::new() }
    }

    /// Tokenize the whole source. Bad input is reported in
    /// [`LexResult::errors`] and skipped; the token list always ends in `Eof`.
    pub fn tokenize(&mut self) -> LexResult {
        let mut tokens = Vec::new();
        let mut raw = RawToken::lexer(self.source);

        while let Some(result) = raw.next() {
            if self.errors.len() >= MAX_ERRORS {
                break;
            }

            let span = raw.span();
            let kind = match result {
                Ok(tok) => match self.convert_token(tok, raw.slice(), span.start, span.end) {
                    Ok(kind) => kind,
                    Err(e) => {
                        self.errors.push(e);
                        continue;
                    }
                },
                Err(()) => {
                    let ch = self.source[span.start..].chars().next().unwrap_or('?');
                    self.errors.push(LexError::unexpected_char(ch, span.start));
                    continue;
                }
            };

            tokens.push(Token {
                kind,
                span: Span::new(span.start, span.end),
            });
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            span: Span::new(self.source.len(), self.source.len()),
        });

        LexResult {
            tokens,
            errors: std::mem::take(&mut self.errors),
        }
    }

    fn convert_token(&self, raw: RawToken, slice: &str, start: usize, end: usize) -> Result<TokenKind, LexError> {
        Ok(match raw {
            RawToken::Class => TokenKind::Class,
            RawToken::Else => TokenKind::Else,
            RawToken::False => TokenKind::Bool(false),
            RawToken::Fun => TokenKind::Fun,
            RawToken::If => TokenKind::If,
            RawToken::Null => TokenKind::Null,
            RawToken::Print => TokenKind::Print,
            RawToken::Return => TokenKind::Return,
            RawToken::Super => TokenKind::Super,
            RawToken::This => TokenKind::This,
            RawToken::True => TokenKind::Bool(true),
            RawToken::Var => TokenKind::Var,
            RawToken::While => TokenKind::While,
            RawToken::New => TokenKind::New,
            RawToken::Extends => TokenKind::Extends,

            RawToken::BangEq => TokenKind::BangEq,
            RawToken::EqEq => TokenKind::EqEq,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Bang => TokenKind::Bang,
            RawToken::Eq => TokenKind::Eq,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,
            RawToken::Dot => TokenKind::Dot,

            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Semi => TokenKind::Semi,

            RawToken::Number => {
                let value = slice.parse::<f64>().map_err(|_| LexError::invalid_number(start, end))?;
                TokenKind::Number(value)
            }
            RawToken::String => {
                let inner = &slice[1..slice.len() - 1];
                TokenKind::String(parse_string(inner, start)?)
            }
            RawToken::UnterminatedString => return Err(LexError::unterminated_string(start, end)),
            RawToken::Ident => TokenKind::Ident(slice.to_string()),

            RawToken::LineComment => unreachable!("comments are skipped"),
        })
    }
}

/// Decode the body of a string literal.
fn parse_string(s: &str, pos: usize) -> Result<String, LexError> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        out.push(match chars.next() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('0') => '\0',
            Some('\\') => '\\',
            Some('"') => '"',
            _ => return Err(LexError::invalid_escape(pos)),
        });
    }
    Ok(out)
}

/// Tokens plus any errors found while lexing.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A lexer error with location and an optional fix-it hint.
#[derive(Debug, Clone)]
pub struct LexError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LexError {}

impl LexError {
    fn unexpected_char(ch: char, pos: usize) -> Self {
        Self {
            span: Span::new(pos, pos + ch.len_utf8()),
            message: format!("Unexpected character '{}'", ch),
            hint: None,
        }
    }

    fn unterminated_string(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end),
            message: "Unterminated string".to_string(),
            hint: Some("add a closing '\"'".to_string()),
        }
    }

    fn invalid_escape(pos: usize) -> Self {
        Self {
            span: Span::new(pos, pos + 1),
            message: "Invalid escape sequence".to_string(),
            hint: Some("valid escapes: \\n \\t \\r \\0 \\\\ \\\"".to_string()),
        }
    }

    fn invalid_number(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end),
            message: "Invalid number".to_string(),
            hint: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let result = Lexer::new(src).tokenize();
        assert!(result.is_ok(), "lex errors: {:?}", result.errors);
        result.tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn var_declaration() {
        assert_eq!(
            kinds("var obj = new Node();"),
            vec![
                TokenKind::Var,
                TokenKind::Ident("obj".into()),
                TokenKind::Eq,
                TokenKind::New,
                TokenKind::Ident("Node".into()),
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn two_char_operators_win() {
        assert_eq!(
            kinds("a != b == c <= d >= e < f > g = !h"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::BangEq,
                TokenKind::Ident("b".into()),
                TokenKind::EqEq,
                TokenKind::Ident("c".into()),
                TokenKind::LtEq,
                TokenKind::Ident("d".into()),
                TokenKind::GtEq,
                TokenKind::Ident("e".into()),
                TokenKind::Lt,
                TokenKind::Ident("f".into()),
                TokenKind::Gt,
                TokenKind::Ident("g".into()),
                TokenKind::Eq,
                TokenKind::Bang,
                TokenKind::Ident("h".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords_and_prefixed_identifiers() {
        assert_eq!(
            kinds("class classy true null newer"),
            vec![
                TokenKind::Class,
                TokenKind::Ident("classy".into()),
                TokenKind::Bool(true),
                TokenKind::Null,
                TokenKind::Ident("newer".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(
            kinds("42 3.25 0.5"),
            vec![
                TokenKind::Number(42.0),
                TokenKind::Number(3.25),
                TokenKind::Number(0.5),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn strings_with_escapes() {
        assert_eq!(
            kinds(r#""a\tb" "say \"hi\"""#),
            vec![
                TokenKind::String("a\tb".into()),
                TokenKind::String("say \"hi\"".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_and_newlines_are_skipped() {
        assert_eq!(
            kinds("print 1; // trailing\n// whole line\nprint 2;"),
            vec![
                TokenKind::Print,
                TokenKind::Number(1.0),
                TokenKind::Semi,
                TokenKind::Print,
                TokenKind::Number(2.0),
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn spans_point_into_source() {
        let result = Lexer::new("var  answer").tokenize();
        assert_eq!(result.tokens[1].span, Span::new(5, 11));
        assert_eq!(result.tokens[2].span, Span::new(11, 11));
    }

    #[test]
    fn unexpected_character_is_reported_and_skipped() {
        let result = Lexer::new("var a = 1 # 2;").tokenize();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].span, Span::new(10, 11));
        assert!(result.errors[0].message.contains('#'));
        assert!(result.tokens.iter().any(|t| t.kind == TokenKind::Number(2.0)));
    }

    #[test]
    fn unterminated_string() {
        let result = Lexer::new("print \"oops;").tokenize();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "Unterminated string");
        assert_eq!(result.tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
    }

    #[test]
    fn bad_escape() {
        let result = Lexer::new(r#""\q""#).tokenize();
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].hint.is_some());
    }
}
