//! Derived identifiers.
//!
//! Every name is a pure function of the type name, the member name and the
//! member kind, so generated code and the runtime agree without sharing
//! state.

use super::graph::{Edge, Field, Type};
use std_util::str;

/// Which builder a name is derived for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderKind {
    Create,
    Update,
    UpdateOne,
    Delete,
    Query,
    Mutation,
    Client,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeNames {
    pub label: String,
    pub table: String,
    pub create: String,
    pub update: String,
    pub update_one: String,
    pub delete: String,
    pub query: String,
    pub mutation: String,
    pub client: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    pub constant: String,
    pub column: String,
    pub default_symbol: String,
    pub update_default_symbol: String,
    pub validator_symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeNames {
    pub constant: String,
    pub table_constant: String,
    pub inverse_table_constant: String,
    pub column_constant: String,
    pub primary_key_constant: String,
}

pub fn type_names(ty: &Type) -> TypeNames {
    let pascal = ty.name.upper_camel_case();

    TypeNames {
        label: ty.label(),
        table: ty.table.clone(),
        create: builder_name(&pascal, BuilderKind::Create),
        update: builder_name(&pascal, BuilderKind::Update),
        update_one: builder_name(&pascal, BuilderKind::UpdateOne),
        delete: builder_name(&pascal, BuilderKind::Delete),
        query: builder_name(&pascal, BuilderKind::Query),
        mutation: builder_name(&pascal, BuilderKind::Mutation),
        client: builder_name(&pascal, BuilderKind::Client),
    }
}

pub fn field_names(ty: &Type, field: &Field) -> FieldNames {
    let label = ty.label();

    FieldNames {
        constant: field_constant(&field.name.app_name),
        column: field.column().to_string(),
        default_symbol: default_symbol(&label, &field.name.app_name),
        update_default_symbol: update_default_symbol(&label, &field.name.app_name),
        validator_symbol: validator_symbol(&label, &field.name.app_name),
    }
}

pub fn edge_names(edge: &Edge) -> EdgeNames {
    EdgeNames {
        constant: edge_constant(&edge.name),
        table_constant: edge_table_constant(&edge.name),
        inverse_table_constant: edge_inverse_table_constant(&edge.name),
        column_constant: edge_column_constant(&edge.name),
        primary_key_constant: edge_primary_key_constant(&edge.name),
    }
}

/// `User` -> `user`
pub fn label(type_name: &str) -> String {
    str::snake_case(type_name)
}

/// `PetOwner` -> `pet_owners`
pub fn table(type_name: &str) -> String {
    str::pluralize(&str::snake_case(type_name))
}

pub fn builder_name(pascal: &str, kind: BuilderKind) -> String {
    let suffix = match kind {
        BuilderKind::Create => "Create",
        BuilderKind::Update => "Update",
        BuilderKind::UpdateOne => "UpdateOne",
        BuilderKind::Delete => "Delete",
        BuilderKind::Query => "Query",
        BuilderKind::Mutation => "Mutation",
        BuilderKind::Client => "Client",
    };

    format!("{pascal}{suffix}")
}

/// `FIELD_NAME`
pub fn field_constant(field: &str) -> String {
    format!("FIELD_{}", str::upper_snake_case(field))
}

/// `EDGE_PETS`
pub fn edge_constant(edge: &str) -> String {
    format!("EDGE_{}", str::upper_snake_case(edge))
}

/// `PETS_TABLE`
pub fn edge_table_constant(edge: &str) -> String {
    format!("{}_TABLE", str::upper_snake_case(edge))
}

/// `PETS_INVERSE_TABLE`
pub fn edge_inverse_table_constant(edge: &str) -> String {
    format!("{}_INVERSE_TABLE", str::upper_snake_case(edge))
}

/// `PETS_COLUMN`
pub fn edge_column_constant(edge: &str) -> String {
    format!("{}_COLUMN", str::upper_snake_case(edge))
}

/// `FRIENDS_PRIMARY_KEY`
pub fn edge_primary_key_constant(edge: &str) -> String {
    format!("{}_PRIMARY_KEY", str::upper_snake_case(edge))
}

/// A constant of another type's module, `user::FIELD_ID`.
pub fn qualified(label: &str, constant: &str) -> String {
    format!("{label}::{constant}")
}

pub fn default_symbol(label: &str, field: &str) -> String {
    format!("{label}::default_{}", str::snake_case(field))
}

pub fn update_default_symbol(label: &str, field: &str) -> String {
    format!("{label}::update_default_{}", str::snake_case(field))
}

pub fn validator_symbol(label: &str, field: &str) -> String {
    format!("{label}::{}_validator", str::snake_case(field))
}

/// Foreign-key column of an O2O/O2M/M2O edge, `user_pets`.
pub fn fk_column(label: &str, edge: &str) -> String {
    format!("{label}_{}", str::snake_case(edge))
}

/// Join table of an M2M edge, `user_friends`.
pub fn join_table(label: &str, edge: &str) -> String {
    format!("{label}_{}", str::snake_case(edge))
}

/// `user_id`
pub fn id_column(label: &str) -> String {
    format!("{label}_id")
}

/// `friends` -> `friend_id`
pub fn singular_id_column(edge: &str) -> String {
    format!("{}_id", str::singularize(&str::snake_case(edge)))
}
