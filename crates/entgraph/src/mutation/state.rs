use entgraph_core::stmt::Value;

use indexmap::IndexSet;

/// Pending changes of one field.
#[derive(Debug, Clone, Default)]
pub(crate) struct FieldState {
    pub(crate) set: Option<Value>,

    /// Numeric delta
    pub(crate) add: Option<Value>,

    /// JSON array elements to append
    pub(crate) append: Option<Value>,
}

/// Pending changes of one edge.
#[derive(Debug, Clone, Default)]
pub(crate) struct EdgeState {
    /// Neighbors to link. Unique edges hold at most one.
    pub(crate) added: IndexSet<Value>,

    /// Neighbors to unlink. Always disjoint from `added`.
    pub(crate) removed: IndexSet<Value>,

    /// Unlink every current neighbor before adding.
    pub(crate) cleared: bool,
}

impl EdgeState {
    pub(crate) fn add(&mut self, id: Value) {
        self.removed.shift_remove(&id);
        self.added.insert(id);
    }

    pub(crate) fn remove(&mut self, id: Value) {
        self.added.shift_remove(&id);
        self.removed.insert(id);
    }

    /// Replaces the single neighbor of a unique edge.
    pub(crate) fn set(&mut self, id: Value) {
        self.added.clear();
        self.added.insert(id);
    }
}
