// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexer for the Ember language.
//!
//! Turns source text into the token stream consumed by `ember-parser`.

mod lexer;

pub use lexer::{LexError, LexResult, Lexer};
