mod edge;
pub use edge::{Edge, EdgeId, RelKind, Relation, StorageKey, Through};

mod field;
pub use field::{Field, FieldId, FieldName};

mod fk;
pub use fk::ForeignKey;

mod identity;
pub use identity::Identity;

mod method;
pub use method::{Member, Method, MethodKind};

mod ty;
pub use ty::{Type, TypeId};

use indexmap::IndexMap;

/// All entity types of a schema. Types reference each other by id, so the
/// graph can hold the cycles formed by paired edges.
#[derive(Debug, Default, Clone)]
pub struct Graph {
    pub types: IndexMap<TypeId, Type>,

    /// Prepended to derived join-table names
    pub table_name_prefix: String,
}

impl Graph {
    pub fn types(&self) -> impl ExactSizeIterator<Item = &Type> {
        self.types.values()
    }

    /// Get a type by id
    #[track_caller]
    pub fn ty(&self, id: impl Into<TypeId>) -> &Type {
        self.types.get(&id.into()).expect("invalid type ID")
    }

    #[track_caller]
    pub fn ty_mut(&mut self, id: impl Into<TypeId>) -> &mut Type {
        self.types.get_mut(&id.into()).expect("invalid type ID")
    }

    pub fn ty_by_name(&self, name: &str) -> Option<&Type> {
        self.types
            .values()
            .find(|ty| ty.name.upper_camel_case() == name || ty.decl_name == name)
    }

    /// Get a field by id
    #[track_caller]
    pub fn field(&self, id: FieldId) -> &Field {
        self.ty(id.ty)
            .fields
            .get(id.index)
            .expect("invalid field ID")
    }

    #[track_caller]
    pub fn field_mut(&mut self, id: FieldId) -> &mut Field {
        self.ty_mut(id.ty)
            .fields
            .get_mut(id.index)
            .expect("invalid field ID")
    }

    /// Get an edge by id
    #[track_caller]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        self.ty(id.ty).edges.get(id.index).expect("invalid edge ID")
    }

    #[track_caller]
    pub fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        self.ty_mut(id.ty)
            .edges
            .get_mut(id.index)
            .expect("invalid edge ID")
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.types.values().flat_map(|ty| ty.edges.iter())
    }

    pub(crate) fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges().map(|edge| edge.id).collect()
    }

    /// Returns `Type.edge` for diagnostics.
    pub fn edge_path(&self, id: EdgeId) -> String {
        format!("{}.{}", self.ty(id.ty).name, self.edge(id).name)
    }

    /// Returns `Type.field` for diagnostics.
    pub fn field_path(&self, id: FieldId) -> String {
        format!("{}.{}", self.ty(id.ty).name, self.field(id).name.app_name)
    }
}
