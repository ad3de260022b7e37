use super::{Edge, Field, FieldId, ForeignKey, Identity, Method};
use crate::schema::Name;

use indexmap::IndexMap;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Type {
    /// Uniquely identifies the type within the graph
    pub id: TypeId,

    /// Name as declared
    pub decl_name: String,

    /// Name of the type
    pub name: Name,

    /// Storage table, prefix included
    pub table: String,

    pub identity: Identity,

    /// Declared fields, identity fields included
    pub fields: Vec<Field>,

    /// Declared edges, followed by edges synthesized for through types
    pub edges: Vec<Edge>,

    /// Foreign-key columns held by this type's table
    pub foreign_keys: Vec<ForeignKey>,

    /// Number of mutation hooks registered on the client. Zero until a
    /// client is built over the schema.
    pub hooks: usize,

    /// Number of query interceptors registered on the client
    pub interceptors: usize,

    /// Number of privacy policies registered on the client
    pub policies: usize,

    /// Accessor methods, keyed by name. Names already taken by an earlier
    /// member are skipped.
    pub methods: IndexMap<String, Method>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub usize);

impl Type {
    /// The snake-case label used in derived storage names.
    pub fn label(&self) -> String {
        self.name.snake_case()
    }

    pub fn field(&self, id: impl Into<FieldId>) -> &Field {
        let id = id.into();
        assert_eq!(self.id, id.ty);
        &self.fields[id.index]
    }

    /// Looks a field up by its name, falling back to its storage column.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|field| field.name.app_name == name)
            .or_else(|| self.fields.iter().find(|field| field.column() == name))
    }

    pub fn edge_by_name(&self, name: &str) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.name == name)
    }

    /// The single identity field. Panics for composite identities.
    #[track_caller]
    pub fn expect_id_field(&self) -> &Field {
        match &self.identity {
            Identity::Single(id) => self.field(*id),
            Identity::Composite(_) => panic!("type {} has a composite identity", self.name),
        }
    }

    /// Identity fields, in order.
    pub fn id_fields(&self) -> impl ExactSizeIterator<Item = &Field> + '_ {
        self.identity.fields().iter().map(|id| self.field(*id))
    }

    /// Storage column of the first identity field.
    pub fn id_column(&self) -> &str {
        self.field(self.identity.fields()[0]).name.storage_name()
    }

    /// Storage columns of every identity field.
    pub fn id_columns(&self) -> Vec<String> {
        self.id_fields()
            .map(|field| field.name.storage_name().to_string())
            .collect()
    }

    /// Storage columns returned when an entity of this type is hydrated.
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self
            .fields
            .iter()
            .map(|field| field.name.storage_name().to_string())
            .collect();

        for fk in &self.foreign_keys {
            if !fk.user_defined {
                columns.push(fk.column.clone());
            }
        }

        columns
    }

    /// Types with hooks or policies run user code before save, so defaults
    /// and validators for them are checked at save time instead of when the
    /// client is built.
    pub fn runtime_checked(&self) -> bool {
        self.hooks + self.policies > 0
    }

    pub fn has_composite_id(&self) -> bool {
        self.identity.is_composite()
    }
}

impl TypeId {
    /// Create a `FieldId` representing the current type's field at index
    /// `index`.
    pub const fn field(self, index: usize) -> FieldId {
        FieldId { ty: self, index }
    }

    pub const fn edge(self, index: usize) -> super::EdgeId {
        super::EdgeId { ty: self, index }
    }
}

impl From<&TypeId> for TypeId {
    fn from(src: &TypeId) -> TypeId {
        *src
    }
}

impl From<&Type> for TypeId {
    fn from(value: &Type) -> TypeId {
        value.id
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TypeId({})", self.0)
    }
}
