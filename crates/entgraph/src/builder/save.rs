use super::{check, spec};
use crate::{
    hook::{BoxMutator, Mutator, Outcome},
    privacy, Mutation, Op,
};

use entgraph_core::{async_trait, driver::Operation, schema::graph::Type, Context, Error, Result};

use std::sync::Arc;

/// Runs `mutation` through its type's hooks, then its privacy policies,
/// then the storage write.
pub(super) async fn run(cx: &Context, mutation: &mut Mutation) -> Result<Outcome> {
    let client = mutation.client().clone();

    let inner: BoxMutator = Arc::new(Privacy {
        next: Arc::new(Save),
    });

    client
        .mutator(mutation.type_id(), inner)
        .mutate(cx, mutation)
        .await
}

/// Evaluates the mutation policies of the type before calling `next`.
struct Privacy {
    next: BoxMutator,
}

#[async_trait]
impl Mutator for Privacy {
    async fn mutate(&self, cx: &Context, mutation: &mut Mutation) -> Result<Outcome> {
        let client = mutation.client().clone();
        privacy::eval_mutation(client.policies(mutation.type_id()), cx, mutation).await?;
        self.next.mutate(cx, mutation).await
    }
}

/// Checks the mutation, assembles its spec and hands it to the executor.
struct Save;

#[async_trait]
impl Mutator for Save {
    async fn mutate(&self, cx: &Context, mutation: &mut Mutation) -> Result<Outcome> {
        let outcome = match mutation.op() {
            Op::Create => save_create(cx, mutation).await.map(Outcome::Entity),
            Op::Update => save_update(cx, mutation).await.map(Outcome::Count),
            Op::UpdateOne => save_update_one(cx, mutation).await.map(Outcome::Entity),
            Op::Delete => save_delete(cx, mutation).await.map(Outcome::Count),
            Op::DeleteOne => save_delete_one(cx, mutation).await.map(Outcome::Count),
        };

        mutation.mark_done();
        outcome
    }
}

async fn save_create(cx: &Context, m: &Mutation) -> Result<entgraph_core::stmt::Record> {
    check::check_create(m)?;

    let spec = spec::create_spec(m)?;
    tracing::debug!(table = %spec.node.table, fields = spec.fields.len(), edges = spec.edges.len(), "create");

    m.client()
        .exec(cx, Operation::Create(spec))
        .await
        .map_err(|err| storage_error(m.ty(), err))?
        .into_record()
}

async fn save_update(cx: &Context, m: &Mutation) -> Result<u64> {
    check::check_update(m)?;

    let spec = spec::update_spec(m, false)?;
    tracing::debug!(table = %spec.node.table, predicate = ?spec.predicate, "update");

    m.client()
        .exec(cx, Operation::Update(spec))
        .await
        .map_err(|err| storage_error(m.ty(), err))?
        .into_count()
}

async fn save_update_one(cx: &Context, m: &Mutation) -> Result<entgraph_core::stmt::Record> {
    spec::require_id(m, "update")?;
    check::check_update(m)?;

    let spec = spec::update_spec(m, true)?;
    tracing::debug!(table = %spec.node.table, id = ?spec.node.id, "update one");

    m.client()
        .exec(cx, Operation::UpdateOne(spec))
        .await
        .map_err(|err| storage_error(m.ty(), err))?
        .into_record()
}

async fn save_delete(cx: &Context, m: &Mutation) -> Result<u64> {
    let spec = spec::delete_spec(m, false)?;
    tracing::debug!(table = %spec.table, predicate = ?spec.predicate, "delete");

    m.client()
        .exec(cx, Operation::Delete(spec))
        .await
        .map_err(|err| storage_error(m.ty(), err))?
        .into_count()
}

async fn save_delete_one(cx: &Context, m: &Mutation) -> Result<u64> {
    spec::require_id(m, "delete")?;

    let spec = spec::delete_spec(m, true)?;
    tracing::debug!(table = %spec.table, predicate = ?spec.predicate, "delete one");

    let count = m
        .client()
        .exec(cx, Operation::Delete(spec))
        .await
        .map_err(|err| storage_error(m.ty(), err))?
        .into_count()?;

    if count == 0 {
        return Err(Error::not_found(m.ty().label()));
    }

    Ok(count)
}

/// Re-wraps storage errors into domain errors.
pub(super) fn storage_error(ty: &Type, err: Error) -> Error {
    if err.is_record_not_found() {
        Error::not_found(ty.label())
    } else if err.is_driver_constraint() {
        Error::constraint(err)
    } else {
        err
    }
}
