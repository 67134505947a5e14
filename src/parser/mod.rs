//! Recursive-descent parser.
//!
//! The parser wraps a lazy `Lexer` behind a one-token lookahead cursor and
//! hands back one top-level statement per `next_stmt` call, so statements can
//! be checked and evaluated before later lines are even tokenized. Expression
//! parsing is a fixed precedence ladder (`||` < `&&` < comparisons < additive
//! < multiplicative < unary < primary); statement parsing dispatches on the
//! leading token.

pub mod cursor;
pub mod expr;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
