use crate::stmt::Value;

/// The node (row) an operation writes to.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    /// Table holding the node
    pub table: String,

    /// Columns to return when the executor hydrates the node
    pub columns: Vec<String>,

    /// Identity of the node
    pub id: IdSpec,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IdSpec {
    /// A single identity column. The value is unset for batch operations and
    /// for creates that let storage assign the id.
    Single {
        column: String,
        value: Option<Value>,
    },

    /// An ordered composite identity (join entities).
    Composite {
        columns: Vec<String>,
        values: Vec<Option<Value>>,
    },
}

impl IdSpec {
    pub fn is_composite(&self) -> bool {
        matches!(self, IdSpec::Composite { .. })
    }

    pub fn columns(&self) -> Vec<&str> {
        match self {
            IdSpec::Single { column, .. } => vec![column],
            IdSpec::Composite { columns, .. } => columns.iter().map(String::as_str).collect(),
        }
    }

    /// Returns the identity as a single value, `List` for composites.
    /// `None` if any component is missing.
    pub fn value(&self) -> Option<Value> {
        match self {
            IdSpec::Single { value, .. } => value.clone(),
            IdSpec::Composite { values, .. } => values
                .iter()
                .cloned()
                .collect::<Option<Vec<_>>>()
                .map(Value::List),
        }
    }
}
