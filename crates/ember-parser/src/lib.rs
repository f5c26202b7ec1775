// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser for the Ember language.
//!
//! Transforms a token stream into a list of statements.

mod hints;
mod parser;

pub use parser::{ParseError, ParseResult, Parser};
