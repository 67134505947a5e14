use std::collections::HashMap;

use crate::{
    ast::{
        types::{BasicKind, Value},
        NodeId,
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

/// One declared name: its committed concrete type and, while the owning
/// scope is live, its current value.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub kind: BasicKind,
    pub value: Option<Value>,
}

#[derive(Debug, Default)]
pub struct Scope {
    symbols: HashMap<String, Symbol>,
}

impl Scope {
    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.symbols.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Symbol> {
        self.symbols.remove(name)
    }

    pub fn insert(&mut self, name: &str, symbol: Symbol) {
        self.symbols.insert(name.to_string(), symbol);
    }

    pub fn declare(&mut self, name: &str, kind: BasicKind, position: &Position) -> Result<(), Error> {
        if self.contains(name) {
            return Err(Error::new(
                ErrorImpl::Conflict {
                    name: name.to_string(),
                },
                position.clone(),
            ));
        }
        self.symbols.insert(
            name.to_string(),
            Symbol { kind, value: None },
        );
        Ok(())
    }

    /// Drops every symbol's value while keeping the declarations. Runs when
    /// the scope's block exits, so re-entry starts from unset variables.
    pub fn clear_values(&mut self) {
        for symbol in self.symbols.values_mut() {
            symbol.value = None;
        }
    }
}

/// Lexical scope stack with block-keyed parking.
///
/// Index 0 is the global scope and lives for the whole session. Every other
/// scope belongs to one syntactic block (or loop header) and is parked under
/// that node's id whenever the block is not executing: the checker creates
/// scopes with `push_new`/`pop_into`, the evaluator re-activates them with
/// `attach`/`detach`. Detaching clears values but keeps declarations, so the
/// checker's view of a block stays valid across runs.
#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
    parked: HashMap<NodeId, Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack {
            scopes: vec![Scope::default()],
            parked: HashMap::new(),
        }
    }

    fn internal(message: &str) -> Error {
        Error::new(
            ErrorImpl::Internal {
                message: message.to_string(),
            },
            Position::null(),
        )
    }

    /// Opens a fresh innermost scope.
    pub fn push_new(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Re-activates the scope parked under `id`, or opens a fresh one on
    /// first entry.
    pub fn attach(&mut self, id: NodeId) {
        let scope = self.parked.remove(&id).unwrap_or_default();
        self.scopes.push(scope);
    }

    /// Closes the innermost scope and parks it under `id` untouched.
    pub fn pop_into(&mut self, id: NodeId) -> Result<(), Error> {
        if self.scopes.len() <= 1 {
            return Err(Self::internal("attempted to pop the global scope"));
        }
        let scope = match self.scopes.pop() {
            Some(scope) => scope,
            None => return Err(Self::internal("scope stack empty")),
        };
        self.parked.insert(id, scope);
        Ok(())
    }

    /// Closes the innermost scope, clears its values and parks it under
    /// `id`. The evaluator's counterpart to `pop_into`.
    pub fn detach(&mut self, id: NodeId) -> Result<(), Error> {
        if self.scopes.len() <= 1 {
            return Err(Self::internal("attempted to detach the global scope"));
        }
        let mut scope = match self.scopes.pop() {
            Some(scope) => scope,
            None => return Err(Self::internal("scope stack empty")),
        };
        scope.clear_values();
        self.parked.insert(id, scope);
        Ok(())
    }

    /// Declares a name in the innermost scope.
    pub fn declare(&mut self, name: &str, kind: BasicKind, position: &Position) -> Result<(), Error> {
        match self.scopes.last_mut() {
            Some(scope) => scope.declare(name, kind, position),
            None => Err(Self::internal("scope stack empty")),
        }
    }

    /// Takes `name` out of the innermost scope, if declared there. Paired
    /// with `insert_current` to hide a declaration from its own
    /// initializers.
    pub fn remove_current(&mut self, name: &str) -> Option<Symbol> {
        self.scopes.last_mut().and_then(|scope| scope.remove(name))
    }

    /// Puts a symbol (back) into the innermost scope, replacing any entry
    /// under the same name.
    pub fn insert_current(&mut self, name: &str, symbol: Symbol) -> Result<(), Error> {
        match self.scopes.last_mut() {
            Some(scope) => {
                scope.insert(name, symbol);
                Ok(())
            }
            None => Err(Self::internal("scope stack empty")),
        }
    }

    /// Whether the innermost scope already declares `name`; shadowing an
    /// outer declaration is not a conflict.
    pub fn current_contains(&self, name: &str) -> bool {
        self.scopes
            .last()
            .is_some_and(|scope| scope.contains(name))
    }

    /// Resolves a name, innermost scope first.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        ScopeStack::new()
    }
}
