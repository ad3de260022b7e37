use super::*;
use crate::stmt::Predicate;

#[derive(Debug, Clone)]
pub struct DeleteSpec {
    pub table: String,

    pub predicate: Predicate,
}

impl From<DeleteSpec> for Operation {
    fn from(value: DeleteSpec) -> Operation {
        Operation::Delete(value)
    }
}
