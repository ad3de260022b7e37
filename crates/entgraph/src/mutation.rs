mod edge;
mod old;

mod state;
pub(crate) use state::{EdgeState, FieldState};

use crate::{Client, Filter, Where};

use entgraph_core::{
    schema::graph::{Field, Type, TypeId},
    stmt::{Record, Value},
    Error, Result, Schema,
};

use indexmap::{IndexMap, IndexSet};
use std::{fmt, sync::Arc};
use tokio::sync::OnceCell;

/// The kind of a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Create,
    Update,
    UpdateOne,
    Delete,
    DeleteOne,
}

impl Op {
    pub fn is_create(self) -> bool {
        matches!(self, Op::Create)
    }

    /// Batch update or update-one.
    pub fn is_update(self) -> bool {
        matches!(self, Op::Update | Op::UpdateOne)
    }

    pub fn is_update_one(self) -> bool {
        matches!(self, Op::UpdateOne)
    }

    pub fn is_delete(self) -> bool {
        matches!(self, Op::Delete | Op::DeleteOne)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Op::Create => "create",
            Op::Update => "update",
            Op::UpdateOne => "update-one",
            Op::Delete => "delete",
            Op::DeleteOne => "delete-one",
        })
    }
}

/// Pending changes to entities of one type.
///
/// A mutation is owned by the builder that created it, handed by reference
/// to hooks and policies, and consumed by the save step. Every field and
/// edge of the type is reachable through the same reflective methods; the
/// typed accessors generated per type are thin wrappers around them.
#[derive(Debug)]
pub struct Mutation {
    client: Client,
    ty: TypeId,
    op: Op,

    /// Identity of the target entity, one slot per identity field
    pub(crate) id: Vec<Option<Value>>,

    /// Keyed by field index
    pub(crate) fields: IndexMap<usize, FieldState>,
    pub(crate) cleared_fields: IndexSet<usize>,

    /// Keyed by edge index
    pub(crate) edges: IndexMap<usize, EdgeState>,

    pub(crate) predicates: Vec<Where>,

    /// Memoized row read by `old_field`
    old: OnceCell<Result<Record>>,

    done: bool,
}

impl Mutation {
    pub(crate) fn new(client: Client, ty: TypeId, op: Op) -> Mutation {
        let arity = client.ty(ty).identity.fields().len();

        Mutation {
            client,
            ty,
            op,
            id: vec![None; arity],
            fields: IndexMap::new(),
            cleared_fields: IndexSet::new(),
            edges: IndexMap::new(),
            predicates: vec![],
            old: OnceCell::new(),
            done: false,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn type_id(&self) -> TypeId {
        self.ty
    }

    /// The entity type being mutated.
    pub fn ty(&self) -> &Type {
        self.client.ty(self.ty)
    }

    pub fn type_name(&self) -> String {
        self.ty().name.upper_camel_case()
    }

    /// Returns `true` once the mutation has been executed.
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub(crate) fn mark_done(&mut self) {
        self.done = true;
    }

    pub(crate) fn schema(&self) -> Arc<Schema> {
        self.client.schema().clone()
    }

    /// The identity of the target entity. Composite identities are returned
    /// as a `List`, and only once every component is known.
    pub fn id(&self) -> Option<Value> {
        if self.ty().has_composite_id() {
            self.id
                .iter()
                .cloned()
                .collect::<Option<Vec<_>>>()
                .map(Value::List)
        } else {
            self.id[0].clone()
        }
    }

    /// Sets the single-field identity.
    pub fn set_id(&mut self, id: impl Into<Value>) -> Result<()> {
        let ty = self.ty();
        if ty.has_composite_id() {
            return Err(Error::usage(format!(
                "type {} has a composite identity; set each identity field instead",
                ty.name
            )));
        }

        self.id[0] = Some(id.into());
        Ok(())
    }

    /// Targets the entity a record was hydrated from.
    pub(crate) fn set_target(&mut self, record: &Record) {
        let columns = self.ty().id_columns();

        for (slot, column) in self.id.iter_mut().zip(&columns) {
            let value = record.get(column);
            *slot = (!value.is_null()).then(|| value.clone());
        }
    }

    /// Names of the fields set by this mutation.
    pub fn fields(&self) -> Vec<String> {
        let ty = self.ty();

        ty.fields
            .iter()
            .filter(|field| !(field.primary_key && !ty.has_composite_id()))
            .filter(|field| self.field(&field.name.app_name).is_some())
            .map(|field| field.name.app_name.clone())
            .collect()
    }

    /// The value set for the named field, if any.
    pub fn field(&self, name: &str) -> Option<Value> {
        let ty = self.ty();
        let field = ty.field_by_name(name)?;

        if let Some(pos) = id_position(ty, field) {
            if let Some(value) = &self.id[pos] {
                return Some(value.clone());
            }
        }

        if let Some(edge) = field.edge {
            return self.edges.get(&edge.index)?.added.first().cloned();
        }

        self.fields.get(&field.id.index)?.set.clone()
    }

    /// Sets the named field, discarding any pending add or append delta and
    /// any earlier clear.
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let schema = self.schema();
        let ty = schema.ty(self.ty);
        let field = field_by_name(ty, name)?;
        self.check_writable(ty, field)?;

        let value = value.into();
        tracing::trace!(ty = %ty.name, field = name, %value, "set field");

        if let Some(pos) = id_position(ty, field) {
            if self.op.is_update() {
                return Err(Error::usage(format!(
                    "identity field {}.{name} cannot be updated",
                    ty.name
                )));
            }

            self.id[pos] = Some(value.clone());

            if !ty.has_composite_id() {
                return Ok(());
            }
        }

        self.cleared_fields.shift_remove(&field.id.index);

        if let Some(edge) = field.edge {
            self.edges.entry(edge.index).or_default().set(value);
            return Ok(());
        }

        let state = self.fields.entry(field.id.index).or_default();
        state.set = Some(value);
        state.add = None;
        state.append = None;

        Ok(())
    }

    /// Names of the fields with a pending numeric delta.
    pub fn added_fields(&self) -> Vec<String> {
        self.field_names(|state| state.add.is_some())
    }

    pub fn added_field(&self, name: &str) -> Option<Value> {
        let field = self.ty().field_by_name(name)?;
        self.fields.get(&field.id.index)?.add.clone()
    }

    /// Adds `delta` to the named numeric field. Deltas accumulate and a set
    /// value, if any, is kept.
    pub fn add_field(&mut self, name: &str, delta: impl Into<Value>) -> Result<()> {
        let schema = self.schema();
        let ty = schema.ty(self.ty);
        let field = field_by_name(ty, name)?;
        self.check_writable(ty, field)?;

        if !field.ty.is_numeric() || field.primary_key || field.is_edge_field() {
            return Err(Error::usage(format!(
                "field {}.{name} does not support add",
                ty.name
            )));
        }

        let delta = delta.into();
        check_delta(ty, field, &delta)?;
        tracing::trace!(ty = %ty.name, field = name, %delta, "add field");

        let state = self.fields.entry(field.id.index).or_default();
        state.add = Some(match &state.add {
            Some(prev) => prev.add(&delta).map_err(|cause| {
                cause.context(Error::validation(
                    name,
                    format!("delta overflows field \"{}.{name}\"", ty.name),
                ))
            })?,
            None => delta,
        });

        Ok(())
    }

    /// Names of the fields with pending JSON array elements.
    pub fn appended_fields(&self) -> Vec<String> {
        self.field_names(|state| state.append.is_some())
    }

    pub fn appended_field(&self, name: &str) -> Option<Value> {
        let field = self.ty().field_by_name(name)?;
        self.fields.get(&field.id.index)?.append.clone()
    }

    /// Appends the elements of a JSON array to the named JSON field.
    pub fn append_field(&mut self, name: &str, elements: impl Into<Value>) -> Result<()> {
        let schema = self.schema();
        let ty = schema.ty(self.ty);
        let field = field_by_name(ty, name)?;
        self.check_writable(ty, field)?;

        if !field.ty.is_json() {
            return Err(Error::usage(format!(
                "field {}.{name} does not support append",
                ty.name
            )));
        }

        let elements = elements.into();
        check_elements(ty, field, &elements)?;
        tracing::trace!(ty = %ty.name, field = name, %elements, "append field");

        let state = self.fields.entry(field.id.index).or_default();
        state.append = Some(match &state.append {
            Some(prev) => prev.append(&elements)?,
            None => Value::Json(serde_json::Value::Array(vec![])).append(&elements)?,
        });

        Ok(())
    }

    /// Names of the fields explicitly cleared.
    pub fn cleared_fields(&self) -> Vec<String> {
        self.ty()
            .fields
            .iter()
            .filter(|field| self.cleared_fields.contains(&field.id.index))
            .map(|field| field.name.app_name.clone())
            .collect()
    }

    pub fn field_cleared(&self, name: &str) -> bool {
        self.ty()
            .field_by_name(name)
            .is_some_and(|field| self.cleared_fields.contains(&field.id.index))
    }

    /// Sets the named nillable field to NULL.
    pub fn clear_field(&mut self, name: &str) -> Result<()> {
        let schema = self.schema();
        let ty = schema.ty(self.ty);
        let field = field_by_name(ty, name)?;
        self.check_writable(ty, field)?;

        if !field.nillable {
            return Err(Error::usage(format!(
                "field {}.{name} is not nillable",
                ty.name
            )));
        }

        tracing::trace!(ty = %ty.name, field = name, "clear field");

        if let Some(edge) = field.edge {
            let state = self.edges.entry(edge.index).or_default();
            state.added.clear();
            state.cleared = true;
        }

        self.fields.shift_remove(&field.id.index);
        self.cleared_fields.insert(field.id.index);

        Ok(())
    }

    /// Drops every pending change of the named field.
    pub fn reset_field(&mut self, name: &str) -> Result<()> {
        let schema = self.schema();
        let ty = schema.ty(self.ty);
        let field = field_by_name(ty, name)?;

        if let Some(edge) = field.edge {
            self.edges.shift_remove(&edge.index);
        }

        self.fields.shift_remove(&field.id.index);
        self.cleared_fields.shift_remove(&field.id.index);

        Ok(())
    }

    fn check_writable(&self, ty: &Type, field: &Field) -> Result<()> {
        if self.op.is_delete() {
            return Err(Error::usage(format!(
                "cannot change field {}.{} in a {} mutation",
                ty.name, field.name.app_name, self.op
            )));
        }

        if field.immutable && self.op.is_update() && !field.primary_key {
            return Err(Error::usage(format!(
                "field {}.{} is immutable",
                ty.name, field.name.app_name
            )));
        }

        Ok(())
    }

    fn field_names(&self, f: impl Fn(&FieldState) -> bool) -> Vec<String> {
        self.ty()
            .fields
            .iter()
            .filter(|field| self.fields.get(&field.id.index).is_some_and(&f))
            .map(|field| field.name.app_name.clone())
            .collect()
    }
}

impl Filter for Mutation {
    fn where_(&mut self, pred: Where) {
        self.predicates.push(pred);
    }

    fn predicates(&self) -> &[Where] {
        &self.predicates
    }
}

fn field_by_name<'a>(ty: &'a Type, name: &str) -> Result<&'a Field> {
    ty.field_by_name(name)
        .ok_or_else(|| Error::usage(format!("unknown field \"{name}\" on type {}", ty.name)))
}

/// Add deltas must fit the field type: ints for int fields, ints or floats
/// for float fields.
pub(crate) fn check_delta(ty: &Type, field: &Field, delta: &Value) -> Result<()> {
    if field.ty.accepts_delta(delta) {
        return Ok(());
    }

    let name = &field.name.app_name;
    Err(Error::validation(
        name.as_str(),
        format!(
            "invalid delta for field \"{}.{name}\": expected {}, got {delta}",
            ty.name, field.ty
        ),
    ))
}

/// Appended elements must be a JSON array.
pub(crate) fn check_elements(ty: &Type, field: &Field, elements: &Value) -> Result<()> {
    if field.ty.accepts_elements(elements) {
        return Ok(());
    }

    let name = &field.name.app_name;
    Err(Error::validation(
        name.as_str(),
        format!(
            "invalid elements for field \"{}.{name}\": expected a JSON array, got {elements}",
            ty.name
        ),
    ))
}

fn id_position(ty: &Type, field: &Field) -> Option<usize> {
    ty.identity.fields().iter().position(|id| *id == field.id)
}
