//! Error types and error handling for the interpreter.
//!
//! This module defines the error types used throughout the pipeline.
//! It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for the lexing, parsing, checking and
//!   evaluation phases
//! - The taxonomy names reported to the user (SyntaxError, Conflict,
//!   SymbolNotFound, InvalidOperation, InternalError)
//! - Helpful error messages and suggestions

pub mod errors;

#[cfg(test)]
mod tests;
