mod builder;
pub use builder::Builder;

pub mod config;
pub use config::Config;

pub mod db;

pub mod decl;
pub use decl::{EdgeDecl, FieldDecl, SchemaDecl, TypeDecl};

pub mod graph;
use graph::{EdgeId, Type, TypeId};

mod name;
pub use name::Name;

pub mod naming;

mod resolve;

mod step;
pub use step::{Step, StepEnd};

mod through;

mod verify;

use crate::Result;
use db::Table;
use indexmap::IndexMap;
use std::sync::Arc;

#[derive(Debug)]
pub struct Schema {
    /// Entity graph
    pub graph: graph::Graph,

    /// Database-level layout
    pub db: Arc<db::Schema>,

    /// One traversal step per resolved edge
    pub steps: IndexMap<EdgeId, Arc<Step>>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Builds a schema with default options.
    pub fn from_decl(decl: &SchemaDecl) -> Result<Schema> {
        Builder::new().build(decl)
    }

    #[track_caller]
    pub fn ty(&self, id: impl Into<TypeId>) -> &Type {
        self.graph.ty(id)
    }

    pub fn ty_by_name(&self, name: &str) -> Option<&Type> {
        self.graph.ty_by_name(name)
    }

    #[track_caller]
    pub fn step(&self, edge: EdgeId) -> &Arc<Step> {
        self.steps.get(&edge).expect("invalid edge ID")
    }

    pub fn table_for(&self, id: impl Into<TypeId>) -> &Table {
        let id = id.into();
        self.db
            .tables
            .iter()
            .find(|table| table.ty == Some(id))
            .expect("type has no table")
    }
}
