mod graph;
mod table;

use super::{config::Config, db, decl::SchemaDecl, step, Schema};
use crate::Result;

use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    /// If set, prefix all table names with this string
    table_name_prefix: Option<String>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            table_name_prefix: None,
        }
    }

    pub fn from_config(config: &Config) -> Builder {
        Builder {
            table_name_prefix: config.table_name_prefix.clone(),
        }
    }

    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Builder {
        self.table_name_prefix = Some(prefix.to_string());
        self
    }

    pub fn build(&self, decl: &SchemaDecl) -> Result<Schema> {
        let mut graph = self.build_graph(decl)?;

        graph.resolve()?;
        graph.build_methods();

        let steps = step::build_steps(&graph);
        let tables = table::build_tables(&graph);

        let schema = Schema {
            graph,
            db: Arc::new(db::Schema { tables }),
            steps,
        };

        schema.verify()?;

        tracing::debug!(
            types = schema.graph.types.len(),
            tables = schema.db.tables.len(),
            "built schema"
        );

        Ok(schema)
    }

    fn prefix_table_name(&self, name: &str) -> String {
        match &self.table_name_prefix {
            Some(prefix) => format!("{prefix}{name}"),
            None => name.to_string(),
        }
    }
}
