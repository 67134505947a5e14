//! Lexical analysis module for the interpreter.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a lazily produced stream of tokens for parsing. It handles:
//!
//! - Line-buffered cursor tracking with (line, column) positions
//! - Recognition of keywords, identifiers, literals, and punctuators
//! - Numeric literal shapes matched by regex patterns in priority order
//! - String escape validation as a separate pass
//! - Comments, whitespace, and one Newline token per physical line

pub mod cursor;
pub mod lexer;
pub mod tokens;
