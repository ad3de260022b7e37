use super::*;
use crate::{
    schema::Step,
    stmt::{OrderTerm, Predicate},
};

use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct QuerySpec {
    /// Table to query
    pub table: String,

    /// Which columns to return
    pub columns: Vec<String>,

    pub predicate: Predicate,

    pub order: Vec<OrderTerm>,

    pub limit: Option<usize>,

    pub offset: Option<usize>,

    /// Return distinct rows only
    pub unique: bool,

    /// When set, the query selects neighbors of the rows matched by
    /// `source`, reached over `step`, and `predicate` filters the neighbors.
    pub from: Option<Box<Neighbors>>,
}

#[derive(Debug, Clone)]
pub struct Neighbors {
    pub step: Arc<Step>,
    pub source: QuerySpec,
}

impl QuerySpec {
    pub fn new(table: impl Into<String>, columns: Vec<String>) -> QuerySpec {
        QuerySpec {
            table: table.into(),
            columns,
            predicate: Predicate::Bool(true),
            order: vec![],
            limit: None,
            offset: None,
            unique: false,
            from: None,
        }
    }
}

impl From<QuerySpec> for Operation {
    fn from(value: QuerySpec) -> Operation {
        Operation::Query(value)
    }
}
