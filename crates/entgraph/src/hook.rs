use crate::Mutation;

use entgraph_core::{
    async_trait,
    driver::{Operation, Response},
    stmt::Record,
    Context, Result,
};

use std::sync::Arc;

/// The result of running a mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A created or updated entity
    Entity(Record),

    /// Entities created in bulk
    Entities(Vec<Record>),

    /// Number of rows affected by a batch update or delete
    Count(u64),
}

impl Outcome {
    pub fn into_entity(self) -> Result<Record> {
        match self {
            Outcome::Entity(record) => Ok(record),
            outcome => entgraph_core::bail!("expected an entity; got {outcome:?}"),
        }
    }

    pub fn into_entities(self) -> Result<Vec<Record>> {
        match self {
            Outcome::Entities(records) => Ok(records),
            Outcome::Entity(record) => Ok(vec![record]),
            outcome => entgraph_core::bail!("expected entities; got {outcome:?}"),
        }
    }

    pub fn into_count(self) -> Result<u64> {
        match self {
            Outcome::Count(count) => Ok(count),
            outcome => entgraph_core::bail!("expected a row count; got {outcome:?}"),
        }
    }
}

/// Runs a mutation. Hooks wrap a `Mutator` with another one and must call
/// the inner mutator at most once.
#[async_trait]
pub trait Mutator: Send + Sync {
    async fn mutate(&self, cx: &Context, mutation: &mut Mutation) -> Result<Outcome>;
}

pub type BoxMutator = Arc<dyn Mutator>;

/// Mutation middleware. Hooks registered first run outermost.
pub type Hook = Arc<dyn Fn(BoxMutator) -> BoxMutator + Send + Sync>;

/// Runs a query operation.
#[async_trait]
pub trait Querier: Send + Sync {
    async fn query(&self, cx: &Context, op: Operation) -> Result<Response>;
}

pub type BoxQuerier = Arc<dyn Querier>;

/// Query middleware. Interceptors registered first run outermost.
pub type Interceptor = Arc<dyn Fn(BoxQuerier) -> BoxQuerier + Send + Sync>;

/// Wraps `inner` with `hooks`, so that `hooks[0]` is the outermost layer.
pub(crate) fn chain_mutator(inner: BoxMutator, hooks: &[Hook]) -> BoxMutator {
    hooks.iter().rev().fold(inner, |next, hook| hook(next))
}

pub(crate) fn chain_querier(inner: BoxQuerier, interceptors: &[Interceptor]) -> BoxQuerier {
    interceptors
        .iter()
        .rev()
        .fold(inner, |next, interceptor| interceptor(next))
}

/// Builds a [`Hook`] from a function wrapping the next mutator.
pub fn hook<M, F>(f: F) -> Hook
where
    M: Mutator + 'static,
    F: Fn(BoxMutator) -> M + Send + Sync + 'static,
{
    Arc::new(move |next: BoxMutator| Arc::new(f(next)) as BoxMutator)
}

/// Builds an [`Interceptor`] from a function wrapping the next querier.
pub fn interceptor<Q, F>(f: F) -> Interceptor
where
    Q: Querier + 'static,
    F: Fn(BoxQuerier) -> Q + Send + Sync + 'static,
{
    Arc::new(move |next: BoxQuerier| Arc::new(f(next)) as BoxQuerier)
}
