use super::TableId;
use crate::stmt::FieldType;

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Uniquely identifies the column in the schema.
    pub id: ColumnId,

    /// The name of the column in the database.
    pub name: String,

    pub ty: FieldType,

    /// Whether or not the column is nullable
    pub nullable: bool,

    pub unique: bool,

    /// True if the column is part of the table's primary key
    pub primary_key: bool,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub struct ColumnId {
    pub table: TableId,
    pub index: usize,
}

impl Column {
    pub(crate) fn new(name: impl Into<String>, ty: FieldType) -> Column {
        Column {
            id: ColumnId::placeholder(),
            name: name.into(),
            ty,
            nullable: false,
            unique: false,
            primary_key: false,
        }
    }
}

impl ColumnId {
    pub(crate) fn placeholder() -> ColumnId {
        ColumnId {
            table: TableId(usize::MAX),
            index: usize::MAX,
        }
    }
}

impl From<&Column> for ColumnId {
    fn from(value: &Column) -> ColumnId {
        value.id
    }
}

impl fmt::Debug for ColumnId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ColumnId({}/{})", self.table.0, self.index)
    }
}
