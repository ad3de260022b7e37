//! Declarative schema input.
//!
//! Declarations can be assembled in code with the chaining helpers below or
//! deserialized from JSON.

use super::graph::StorageKey;
use crate::{stmt::FieldType, Result};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDecl {
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,

    /// Overrides the derived table name.
    #[serde(default)]
    pub table: Option<String>,

    /// Identity field; defaults to an `int` field named `id`.
    #[serde(default)]
    pub id: Option<FieldDecl>,

    /// Names of declared fields forming a composite identity.
    #[serde(default)]
    pub composite_id: Vec<String>,

    #[serde(default)]
    pub fields: Vec<FieldDecl>,

    #[serde(default)]
    pub edges: Vec<EdgeDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: FieldType,

    #[serde(default)]
    pub nillable: bool,

    #[serde(default)]
    pub optional: bool,

    #[serde(default)]
    pub immutable: bool,

    #[serde(default)]
    pub unique: bool,

    #[serde(default)]
    pub default: bool,

    #[serde(default)]
    pub update_default: bool,

    #[serde(default)]
    pub validators: usize,

    #[serde(default)]
    pub enum_values: Vec<String>,

    #[serde(default)]
    pub storage_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDecl {
    pub name: String,

    /// Name of the target type
    pub target: String,

    /// Marks an inverse edge; names the assoc edge on the target.
    #[serde(default)]
    pub inverse_of: Option<String>,

    #[serde(default)]
    pub unique: bool,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub immutable: bool,

    /// Name of a declared field holding the foreign key
    #[serde(default)]
    pub field: Option<String>,

    #[serde(default)]
    pub through: Option<ThroughDecl>,

    #[serde(default)]
    pub storage_key: Option<StorageKey>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThroughDecl {
    /// Name of the edge from the owner to the through type
    pub name: String,

    /// Name of the through type
    #[serde(rename = "type")]
    pub type_name: String,
}

impl SchemaDecl {
    pub fn new() -> SchemaDecl {
        SchemaDecl::default()
    }

    pub fn from_json(src: &str) -> Result<SchemaDecl> {
        Ok(serde_json::from_str(src)?)
    }

    pub fn ty(mut self, ty: TypeDecl) -> SchemaDecl {
        self.types.push(ty);
        self
    }
}

impl TypeDecl {
    pub fn new(name: impl Into<String>) -> TypeDecl {
        TypeDecl {
            name: name.into(),
            table: None,
            id: None,
            composite_id: vec![],
            fields: vec![],
            edges: vec![],
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> TypeDecl {
        self.table = Some(table.into());
        self
    }

    pub fn id(mut self, field: FieldDecl) -> TypeDecl {
        self.id = Some(field);
        self
    }

    pub fn composite_id(mut self, fields: &[&str]) -> TypeDecl {
        self.composite_id = fields.iter().map(|name| name.to_string()).collect();
        self
    }

    pub fn field(mut self, field: FieldDecl) -> TypeDecl {
        self.fields.push(field);
        self
    }

    pub fn edge(mut self, edge: EdgeDecl) -> TypeDecl {
        self.edges.push(edge);
        self
    }
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: FieldType) -> FieldDecl {
        FieldDecl {
            name: name.into(),
            ty,
            nillable: false,
            optional: false,
            immutable: false,
            unique: false,
            default: false,
            update_default: false,
            validators: 0,
            enum_values: vec![],
            storage_key: None,
        }
    }

    pub fn string(name: impl Into<String>) -> FieldDecl {
        FieldDecl::new(name, FieldType::String)
    }

    pub fn int(name: impl Into<String>) -> FieldDecl {
        FieldDecl::new(name, FieldType::Int)
    }

    pub fn float(name: impl Into<String>) -> FieldDecl {
        FieldDecl::new(name, FieldType::Float)
    }

    pub fn bool(name: impl Into<String>) -> FieldDecl {
        FieldDecl::new(name, FieldType::Bool)
    }

    pub fn time(name: impl Into<String>) -> FieldDecl {
        FieldDecl::new(name, FieldType::Time)
    }

    pub fn uuid(name: impl Into<String>) -> FieldDecl {
        FieldDecl::new(name, FieldType::Uuid)
    }

    pub fn bytes(name: impl Into<String>) -> FieldDecl {
        FieldDecl::new(name, FieldType::Bytes)
    }

    pub fn json(name: impl Into<String>) -> FieldDecl {
        FieldDecl::new(name, FieldType::Json)
    }

    pub fn enumeration(name: impl Into<String>, values: &[&str]) -> FieldDecl {
        let mut field = FieldDecl::new(name, FieldType::Enum);
        field.enum_values = values.iter().map(|value| value.to_string()).collect();
        field
    }

    pub fn nillable(mut self) -> FieldDecl {
        self.nillable = true;
        self
    }

    pub fn optional(mut self) -> FieldDecl {
        self.optional = true;
        self
    }

    pub fn immutable(mut self) -> FieldDecl {
        self.immutable = true;
        self
    }

    pub fn unique(mut self) -> FieldDecl {
        self.unique = true;
        self
    }

    pub fn with_default(mut self) -> FieldDecl {
        self.default = true;
        self
    }

    pub fn with_update_default(mut self) -> FieldDecl {
        self.update_default = true;
        self
    }

    pub fn validators(mut self, count: usize) -> FieldDecl {
        self.validators = count;
        self
    }

    pub fn storage_key(mut self, column: impl Into<String>) -> FieldDecl {
        self.storage_key = Some(column.into());
        self
    }
}

impl EdgeDecl {
    /// An assoc edge to `target`.
    pub fn to(name: impl Into<String>, target: impl Into<String>) -> EdgeDecl {
        EdgeDecl {
            name: name.into(),
            target: target.into(),
            inverse_of: None,
            unique: false,
            required: false,
            immutable: false,
            field: None,
            through: None,
            storage_key: None,
        }
    }

    /// An inverse edge referencing the assoc edge `assoc` on `target`.
    pub fn inverse(
        name: impl Into<String>,
        target: impl Into<String>,
        assoc: impl Into<String>,
    ) -> EdgeDecl {
        let mut edge = EdgeDecl::to(name, target);
        edge.inverse_of = Some(assoc.into());
        edge
    }

    pub fn unique(mut self) -> EdgeDecl {
        self.unique = true;
        self
    }

    pub fn required(mut self) -> EdgeDecl {
        self.required = true;
        self
    }

    pub fn immutable(mut self) -> EdgeDecl {
        self.immutable = true;
        self
    }

    pub fn field(mut self, field: impl Into<String>) -> EdgeDecl {
        self.field = Some(field.into());
        self
    }

    pub fn through(mut self, name: impl Into<String>, type_name: impl Into<String>) -> EdgeDecl {
        self.through = Some(ThroughDecl {
            name: name.into(),
            type_name: type_name.into(),
        });
        self
    }

    pub fn storage_table(mut self, table: impl Into<String>) -> EdgeDecl {
        self.storage_key.get_or_insert_with(Default::default).table = Some(table.into());
        self
    }

    pub fn storage_columns(mut self, columns: &[&str]) -> EdgeDecl {
        self.storage_key.get_or_insert_with(Default::default).columns =
            columns.iter().map(|column| column.to_string()).collect();
        self
    }
}
