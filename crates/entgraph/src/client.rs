mod builder;
pub use builder::Builder;

use crate::{
    hook::{self, BoxMutator, BoxQuerier, Hook, Interceptor, Querier},
    mutation::{Mutation, Op},
    privacy::BoxPolicy,
    Create, CreateBulk, Delete, DeleteOne, Funcs, Query, Update, UpdateOne, Where,
};

use entgraph_core::{
    async_trait,
    driver::{Operation, Response},
    schema::graph::{Type, TypeId},
    stmt::{Record, Value},
    Context, Error, Executor, Result, Schema,
};

use indexmap::IndexMap;
use std::sync::Arc;

/// Entry point for building and running operations against one schema.
///
/// Cloning is cheap; every clone shares the schema, executor and registered
/// middleware.
#[derive(Clone)]
pub struct Client {
    shared: Arc<Shared>,
}

pub(crate) struct Shared {
    pub(crate) schema: Arc<Schema>,
    pub(crate) executor: Arc<dyn Executor>,
    pub(crate) funcs: Funcs,
    pub(crate) hooks: IndexMap<TypeId, Vec<Hook>>,
    pub(crate) interceptors: IndexMap<TypeId, Vec<Interceptor>>,
    pub(crate) policies: IndexMap<TypeId, Vec<BoxPolicy>>,
}

/// Names an entity type, either by name or by id.
pub trait TypeRef {
    fn resolve(&self, schema: &Schema) -> Result<TypeId>;
}

impl TypeRef for &str {
    fn resolve(&self, schema: &Schema) -> Result<TypeId> {
        schema
            .ty_by_name(self)
            .map(|ty| ty.id)
            .ok_or_else(|| Error::usage(format!("unknown type \"{self}\"")))
    }
}

impl TypeRef for String {
    fn resolve(&self, schema: &Schema) -> Result<TypeId> {
        self.as_str().resolve(schema)
    }
}

impl TypeRef for TypeId {
    fn resolve(&self, schema: &Schema) -> Result<TypeId> {
        if schema.graph.types.contains_key(self) {
            Ok(*self)
        } else {
            Err(Error::usage(format!("unknown type {self:?}")))
        }
    }
}

impl Client {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.shared.schema
    }

    pub fn funcs(&self) -> &Funcs {
        &self.shared.funcs
    }

    pub fn executor(&self) -> &Arc<dyn Executor> {
        &self.shared.executor
    }

    /// Returns a builder creating one entity of type `ty`.
    pub fn create(&self, ty: impl TypeRef) -> Result<Create> {
        let ty = ty.resolve(&self.shared.schema)?;
        Ok(Create::new(Mutation::new(self.clone(), ty, Op::Create)))
    }

    pub fn create_bulk(&self, builders: impl IntoIterator<Item = Create>) -> CreateBulk {
        CreateBulk::new(self.clone(), builders.into_iter().collect())
    }

    /// Returns a builder updating every entity of type `ty` matching its
    /// predicates.
    pub fn update(&self, ty: impl TypeRef) -> Result<Update> {
        let ty = ty.resolve(&self.shared.schema)?;
        Ok(Update::new(Mutation::new(self.clone(), ty, Op::Update)))
    }

    /// Returns a builder updating the given entity.
    pub fn update_one(&self, record: &Record) -> Result<UpdateOne> {
        let ty = record.ty.resolve(&self.shared.schema)?;
        let mut mutation = Mutation::new(self.clone(), ty, Op::UpdateOne);
        mutation.set_target(record);
        Ok(UpdateOne::new(mutation))
    }

    /// Returns a builder updating the entity with the given id.
    pub fn update_one_id(&self, ty: impl TypeRef, id: impl Into<Value>) -> Result<UpdateOne> {
        let ty = ty.resolve(&self.shared.schema)?;
        let mut mutation = Mutation::new(self.clone(), ty, Op::UpdateOne);
        mutation.set_id(id)?;
        Ok(UpdateOne::new(mutation))
    }

    pub fn delete(&self, ty: impl TypeRef) -> Result<Delete> {
        let ty = ty.resolve(&self.shared.schema)?;
        Ok(Delete::new(Mutation::new(self.clone(), ty, Op::Delete)))
    }

    pub fn delete_one(&self, record: &Record) -> Result<DeleteOne> {
        let ty = record.ty.resolve(&self.shared.schema)?;
        let mut mutation = Mutation::new(self.clone(), ty, Op::DeleteOne);
        mutation.set_target(record);
        Ok(DeleteOne::new(mutation))
    }

    pub fn delete_one_id(&self, ty: impl TypeRef, id: impl Into<Value>) -> Result<DeleteOne> {
        let ty = ty.resolve(&self.shared.schema)?;
        let mut mutation = Mutation::new(self.clone(), ty, Op::DeleteOne);
        mutation.set_id(id)?;
        Ok(DeleteOne::new(mutation))
    }

    pub fn query(&self, ty: impl TypeRef) -> Result<Query> {
        let ty = ty.resolve(&self.shared.schema)?;
        Ok(Query::new(self.clone(), ty))
    }

    /// Loads one entity by id. Fails with `NotFound` if it does not exist.
    pub async fn get(&self, cx: &Context, ty: impl TypeRef, id: impl Into<Value>) -> Result<Record> {
        self.query(ty)?.where_(Where::id_eq(id)).only(cx).await
    }

    pub(crate) fn ty(&self, id: TypeId) -> &Type {
        self.shared.schema.ty(id)
    }

    pub(crate) fn hooks(&self, ty: TypeId) -> &[Hook] {
        self.shared.hooks.get(&ty).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn interceptors(&self, ty: TypeId) -> &[Interceptor] {
        self.shared
            .interceptors
            .get(&ty)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn policies(&self, ty: TypeId) -> &[BoxPolicy] {
        self.shared
            .policies
            .get(&ty)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Wraps `inner` in the hooks registered for `ty`.
    pub(crate) fn mutator(&self, ty: TypeId, inner: BoxMutator) -> BoxMutator {
        hook::chain_mutator(inner, self.hooks(ty))
    }

    /// The executor, wrapped in the interceptors registered for `ty`.
    pub(crate) fn querier(&self, ty: TypeId) -> BoxQuerier {
        let inner: BoxQuerier = Arc::new(Exec {
            executor: self.shared.executor.clone(),
        });
        hook::chain_querier(inner, self.interceptors(ty))
    }

    /// Sends an operation straight to the executor.
    pub(crate) async fn exec(&self, cx: &Context, op: Operation) -> Result<Response> {
        tracing::debug!(op = op.name(), table = ?op.table(), "exec");
        self.shared.executor.exec(cx, op).await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("executor", &self.shared.executor)
            .field("funcs", &self.shared.funcs)
            .finish()
    }
}

/// The innermost querier: hands the operation to the executor.
struct Exec {
    executor: Arc<dyn Executor>,
}

#[async_trait]
impl Querier for Exec {
    async fn query(&self, cx: &Context, op: Operation) -> Result<Response> {
        tracing::debug!(op = op.name(), table = ?op.table(), "exec query");
        self.executor.exec(cx, op).await
    }
}
