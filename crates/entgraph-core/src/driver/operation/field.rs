use crate::stmt::{FieldType, Value};

/// A value destined for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub column: String,
    pub ty: FieldType,
    pub value: Value,
}

/// Field-level changes of an update.
#[derive(Debug, Clone, Default)]
pub struct FieldOps {
    /// `SET column = value`
    pub set: Vec<FieldSpec>,

    /// `SET column = column + value`
    pub add: Vec<FieldSpec>,

    /// `SET column = column || value` on JSON arrays
    pub append: Vec<FieldSpec>,

    /// `SET column = NULL`
    pub clear: Vec<FieldSpec>,
}

impl FieldOps {
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.add.is_empty() && self.append.is_empty() && self.clear.is_empty()
    }
}

impl FieldSpec {
    pub fn new(column: impl Into<String>, ty: FieldType, value: impl Into<Value>) -> FieldSpec {
        FieldSpec {
            column: column.into(),
            ty,
            value: value.into(),
        }
    }
}
