use super::*;
use crate::stmt::Predicate;

#[derive(Debug, Clone)]
pub struct UpdateSpec {
    /// Target table; the id is set for update-one only.
    pub node: NodeSpec,

    /// Filter accumulated from the builder, hooks and policies
    pub predicate: Predicate,

    pub fields: FieldOps,

    pub edges: EdgeOps,
}

impl UpdateSpec {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.edges.is_empty()
    }
}
