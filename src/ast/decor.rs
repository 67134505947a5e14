use std::collections::{HashMap, HashSet};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{
    types::{Ty, Value},
    NodeId,
};

/// Side table of per-node facts accumulated by the checker and evaluator.
///
/// The tree itself stays immutable; the checker records each expression's
/// resolved type here, plus a value for every node it managed to fold, and
/// the evaluator caches computed values in the same slot.
#[derive(Debug, Default)]
pub struct Decorations {
    types: HashMap<NodeId, Ty>,
    values: HashMap<NodeId, Value>,
    folded: HashSet<NodeId>,
}

impl Decorations {
    pub fn new() -> Self {
        Decorations::default()
    }

    pub fn set_type(&mut self, id: NodeId, ty: Ty) {
        self.types.insert(id, ty);
    }

    pub fn ty(&self, id: NodeId) -> Option<Ty> {
        self.types.get(&id).copied()
    }

    /// The recorded type of a node, which the checker must have set before
    /// anything downstream asks for it.
    pub fn expect_ty(&self, id: NodeId, position: &Position) -> Result<Ty, Error> {
        self.ty(id).ok_or_else(|| {
            Error::new(
                ErrorImpl::Internal {
                    message: format!("node {} reached evaluation without a checked type", id),
                },
                position.clone(),
            )
        })
    }

    pub fn set_value(&mut self, id: NodeId, value: Value) {
        self.values.insert(id, value);
    }

    pub fn value(&self, id: NodeId) -> Option<Value> {
        self.values.get(&id).copied()
    }

    /// Marks a node as fully folded: its value is final and evaluation may
    /// return it without recomputing the subtree.
    pub fn mark_folded(&mut self, id: NodeId) {
        self.folded.insert(id);
    }

    pub fn is_folded(&self, id: NodeId) -> bool {
        self.folded.contains(&id)
    }

    /// The folded value of a node, if the checker produced one.
    pub fn folded_value(&self, id: NodeId) -> Option<Value> {
        if self.is_folded(id) {
            self.value(id)
        } else {
            None
        }
    }
}
