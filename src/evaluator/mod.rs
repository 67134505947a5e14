//! Tree-walking evaluation.
//!
//! The second semantic pass. Runs only over statements the checker accepted,
//! so it trusts the decoration table: folded nodes short-circuit to their
//! cached value, and every expression has a recorded type. Control transfer
//! (`break`, `continue`, `return`) travels as an explicit `Flow` result
//! through the ordinary return path rather than as an error.

pub mod evaluator;
