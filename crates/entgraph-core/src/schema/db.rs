mod column;
pub use column::{Column, ColumnId};

mod fk;
pub use fk::{ForeignKey, OnDelete};

mod table;
pub use table::{Table, TableId};

/// Derived relational layout.
#[derive(Debug, Default)]
pub struct Schema {
    pub tables: Vec<Table>,
}

impl Schema {
    #[track_caller]
    pub fn table(&self, id: impl Into<TableId>) -> &Table {
        self.tables.get(id.into().0).expect("invalid table ID")
    }

    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.name == name)
    }

    /// Join tables built for M2M edges without a through type.
    pub fn join_tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter().filter(|table| table.join)
    }
}
