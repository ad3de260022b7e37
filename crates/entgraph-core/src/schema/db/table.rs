use super::{Column, ColumnId, ForeignKey};
use crate::schema::graph::TypeId;

use std::fmt;

/// A database table
#[derive(Debug)]
pub struct Table {
    /// Uniquely identifies a table
    pub id: TableId,

    /// Name of the table
    pub name: String,

    /// The table's columns
    pub columns: Vec<Column>,

    pub primary_key: Vec<ColumnId>,

    pub foreign_keys: Vec<ForeignKey>,

    /// The table backs an M2M edge rather than a type.
    pub join: bool,

    /// The type stored in this table
    pub ty: Option<TypeId>,
}

/// Uniquely identifies a table
#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub struct TableId(pub usize);

impl Table {
    pub(crate) fn new(id: TableId, name: String) -> Table {
        Table {
            id,
            name,
            columns: vec![],
            primary_key: vec![],
            foreign_keys: vec![],
            join: false,
            ty: None,
        }
    }

    pub fn column(&self, id: impl Into<ColumnId>) -> &Column {
        &self.columns[id.into().index]
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn primary_key_columns(&self) -> impl ExactSizeIterator<Item = &Column> + '_ {
        self.primary_key
            .iter()
            .map(|column_id| &self.columns[column_id.index])
    }

    pub(crate) fn push_column(&mut self, mut column: Column) -> ColumnId {
        let id = ColumnId {
            table: self.id,
            index: self.columns.len(),
        };
        column.id = id;

        if column.primary_key {
            self.primary_key.push(id);
        }

        self.columns.push(column);
        id
    }
}

impl From<&Table> for TableId {
    fn from(value: &Table) -> TableId {
        value.id
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableId({})", self.0)
    }
}
