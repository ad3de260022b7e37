use super::Value;
use crate::schema::graph::TypeId;

use indexmap::IndexMap;

/// A hydrated entity row, keyed by storage column name.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub ty: TypeId,
    pub values: IndexMap<String, Value>,
}

impl Record {
    pub fn new(ty: TypeId) -> Record {
        Record {
            ty,
            values: IndexMap::new(),
        }
    }

    /// Returns the value stored for `column`, or `Null` when absent.
    pub fn get(&self, column: &str) -> &Value {
        const NULL: &Value = &Value::Null;
        self.values.get(column).unwrap_or(NULL)
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(column.into(), value.into());
    }
}
