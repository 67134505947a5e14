//! Static semantics.
//!
//! The first of the two semantic passes. Runs over one statement at a time,
//! resolving every expression to a type, rejecting type and scope errors,
//! folding constant subtrees, and range-checking untyped constants against
//! the concrete types they commit to. Its conclusions land in the
//! `Decorations` side table; the tree itself is never touched.
//!
//! Scoping lives here too: `scope::ScopeStack` is shared with the evaluator
//! so both passes agree on which declaration an identifier means.

pub mod scope;
pub mod type_checker;

#[cfg(test)]
mod tests;
