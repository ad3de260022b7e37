use super::{graph::RelKind, Schema};
use crate::{Error, Result};

use std::collections::HashSet;

struct Verify<'a> {
    schema: &'a Schema,
}

impl Schema {
    pub(super) fn verify(&self) -> Result<()> {
        Verify { schema: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        debug_assert!(self.verify_edges_resolved());

        self.verify_table_names_are_unique()?;
        self.verify_column_names_are_unique()?;
        self.verify_each_table_has_a_primary_key()?;
        self.verify_foreign_key_columns_exist()?;
        self.verify_join_keys_have_two_columns()?;
        Ok(())
    }

    fn verify_edges_resolved(&self) -> bool {
        for edge in self.schema.graph.edges() {
            assert_ne!(edge.rel.kind, RelKind::Unknown, "{:?}", edge.id);
            assert!(!edge.rel.columns.is_empty(), "{:?}", edge.id);

            if let Some(pair) = edge.pair {
                let pair = self.schema.graph.edge(pair);
                if !edge.is_through_synthesized() && !pair.is_through_synthesized() {
                    assert_eq!(pair.rel.table, edge.rel.table);
                    assert_eq!(pair.rel.columns, edge.rel.columns);
                }
            }
        }

        true
    }

    fn verify_table_names_are_unique(&self) -> Result<()> {
        let mut names = HashSet::new();

        for table in &self.schema.db.tables {
            if !names.insert(&table.name) {
                return Err(Error::invalid_schema(format!(
                    "duplicate table name \"{}\"",
                    table.name
                )));
            }
        }

        Ok(())
    }

    fn verify_column_names_are_unique(&self) -> Result<()> {
        for table in &self.schema.db.tables {
            let mut names = HashSet::new();

            for column in &table.columns {
                if !names.insert(&column.name) {
                    return Err(Error::invalid_schema(format!(
                        "duplicate column \"{}\" in table \"{}\"",
                        column.name, table.name
                    )));
                }
            }
        }

        Ok(())
    }

    fn verify_each_table_has_a_primary_key(&self) -> Result<()> {
        for table in &self.schema.db.tables {
            if table.primary_key.is_empty() {
                return Err(Error::invalid_schema(format!(
                    "table \"{}\" has no primary key",
                    table.name
                )));
            }
        }

        Ok(())
    }

    fn verify_foreign_key_columns_exist(&self) -> Result<()> {
        for table in &self.schema.db.tables {
            for fk in &table.foreign_keys {
                for column in &fk.columns {
                    if table.column_by_name(column).is_none() {
                        return Err(Error::invalid_schema(format!(
                            "foreign key {} references missing column \"{}\" of table \"{}\"",
                            fk.symbol, column, table.name
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    fn verify_join_keys_have_two_columns(&self) -> Result<()> {
        for edge in self.schema.graph.edges() {
            if edge.rel.kind == RelKind::M2M && edge.rel.columns.len() != 2 {
                return Err(Error::invalid_schema(format!(
                    "join key of edge {} must have exactly two columns; found {:?}",
                    self.schema.graph.edge_path(edge.id),
                    edge.rel.columns
                )));
            }
        }

        Ok(())
    }
}
