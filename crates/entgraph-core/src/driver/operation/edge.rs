use super::FieldSpec;
use crate::{schema::Step, stmt::Value};

use std::sync::Arc;

/// One edge write, described by the shared traversal step of the edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSpec {
    pub step: Arc<Step>,

    /// Identity of the neighbor. `None` in a clear spec means every neighbor.
    pub id: Option<Value>,

    /// Extra column values for the join row (through-type defaults).
    pub fields: Vec<FieldSpec>,
}

/// Edge-level changes of an update.
#[derive(Debug, Clone, Default)]
pub struct EdgeOps {
    /// Edges to insert, applied after `clear`.
    pub add: Vec<EdgeSpec>,

    /// Edges to remove.
    pub clear: Vec<EdgeSpec>,
}

impl EdgeSpec {
    pub fn new(step: &Arc<Step>, id: Option<Value>) -> EdgeSpec {
        EdgeSpec {
            step: step.clone(),
            id,
            fields: vec![],
        }
    }

    pub fn is_clear_all(&self) -> bool {
        self.id.is_none()
    }
}

impl EdgeOps {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.clear.is_empty()
    }
}
