//! Abstract Syntax Tree definitions.
//!
//! This module defines the node types produced by the parser:
//!
//! - Expression nodes (identifiers, literals, unary/binary/logical
//!   operations, function literals)
//! - Statement nodes (declarations, assignments, control flow, blocks)
//! - The concrete/constant type model and runtime values
//! - The decoration side table filled in by the checker and evaluator
//! - Pretty-printing of nodes back to parseable source text
//!
//! Nodes are immutable value trees; everything the later passes learn about
//! a node (inferred type, value, folded flag) lives in `decor::Decorations`,
//! keyed by the parser-assigned `NodeId`.

pub mod decor;
pub mod expressions;
pub mod printer;
pub mod statements;
pub mod types;

/// Identity of one AST node, assigned by the parser's id counter.
pub type NodeId = u32;
