mod create;
pub use create::{CreateBulk, CreateSpec};

mod delete;
pub use delete::DeleteSpec;

mod edge;
pub use edge::{EdgeOps, EdgeSpec};

mod field;
pub use field::{FieldOps, FieldSpec};

mod node;
pub use node::{IdSpec, NodeSpec};

mod query;
pub use query::{Neighbors, QuerySpec};

mod update;
pub use update::UpdateSpec;

use super::*;

#[derive(Debug, Clone)]
pub enum Operation {
    /// Insert one node together with its edges. Responds with the record.
    Create(CreateSpec),

    /// Insert many nodes at once. Responds with the records, in order.
    CreateBulk(CreateBulk),

    /// Update every node matching the predicate. Responds with a count.
    Update(UpdateSpec),

    /// Update the node identified by the spec's id. Responds with the
    /// updated record, or fails with `record_not_found`.
    UpdateOne(UpdateSpec),

    /// Delete every node matching the predicate. Responds with a count.
    Delete(DeleteSpec),

    /// Select rows. Responds with records.
    Query(QuerySpec),

    /// Count the rows a query would select. Responds with a count.
    Count(QuerySpec),
}

impl Operation {
    /// Name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Create(_) => "create",
            Operation::CreateBulk(_) => "create_bulk",
            Operation::Update(_) => "update",
            Operation::UpdateOne(_) => "update_one",
            Operation::Delete(_) => "delete",
            Operation::Query(_) => "query",
            Operation::Count(_) => "count",
        }
    }

    pub fn table(&self) -> Option<&str> {
        match self {
            Operation::Create(spec) => Some(&spec.node.table),
            Operation::CreateBulk(bulk) => bulk.specs.first().map(|spec| &spec.node.table[..]),
            Operation::Update(spec) | Operation::UpdateOne(spec) => Some(&spec.node.table),
            Operation::Delete(spec) => Some(&spec.table),
            Operation::Query(spec) | Operation::Count(spec) => Some(&spec.table),
        }
    }
}
