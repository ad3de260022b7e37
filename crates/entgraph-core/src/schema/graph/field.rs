use super::{EdgeId, TypeId};
use crate::stmt::FieldType;

use std::fmt;

#[derive(Debug, Clone)]
pub struct Field {
    /// Uniquely identifies the field within the containing type.
    pub id: FieldId,

    /// The field name
    pub name: FieldName,

    pub ty: FieldType,

    /// Stored as SQL NULL when unset.
    pub nillable: bool,

    /// Not required when creating, but still NOT NULL in storage unless
    /// also nillable.
    pub optional: bool,

    /// Cannot be changed by an update.
    pub immutable: bool,

    pub unique: bool,

    /// True if the field is part of the identity
    pub primary_key: bool,

    /// A default function is registered for creates.
    pub default: bool,

    /// A default function is registered for updates.
    pub update_default: bool,

    /// Number of validators. Any number greater than zero registers one
    /// combined validator symbol.
    pub validators: usize,

    /// Allowed values of an enum field
    pub enum_values: Vec<String>,

    /// Set when the field holds the foreign key of an edge.
    pub edge: Option<EdgeId>,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId {
    pub ty: TypeId,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct FieldName {
    pub app_name: String,
    pub storage_name: Option<String>,
}

impl FieldName {
    pub fn storage_name(&self) -> &str {
        self.storage_name.as_ref().unwrap_or(&self.app_name)
    }
}

impl Field {
    pub fn column(&self) -> &str {
        self.name.storage_name()
    }

    /// Required at the API surface when creating.
    pub fn is_required(&self) -> bool {
        !self.optional && !self.nillable && !self.default && !self.primary_key
    }

    pub fn is_edge_field(&self) -> bool {
        self.edge.is_some()
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "FieldId({}/{})", self.ty.0, self.index)
    }
}
