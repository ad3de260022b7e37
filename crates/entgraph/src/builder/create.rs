use super::{check, deferred_setters, expect_ok, save, spec, Inner};
use crate::{privacy, Client, Mutation};

use entgraph_core::{driver::Operation, driver::operation, stmt::Record, Context, Result};

/// Creates one entity.
#[derive(Debug)]
pub struct Create {
    inner: Inner,
}

deferred_setters!(Create);

impl Create {
    pub(crate) fn new(mutation: Mutation) -> Create {
        Create {
            inner: Inner::new(mutation),
        }
    }

    /// Fills unset fields from their default functions.
    pub fn defaults(&mut self) -> Result<()> {
        check::create_defaults(&mut self.inner.mutation)
    }

    /// Runs the pre-save checks without saving.
    pub fn check(&self) -> Result<()> {
        self.inner.check_deferred()?;
        check::check_create(&self.inner.mutation)
    }

    /// Creates the entity and returns it as stored.
    pub async fn save(mut self, cx: &Context) -> Result<Record> {
        self.inner.check_deferred()?;
        self.defaults()?;
        save::run(cx, &mut self.inner.mutation).await?.into_entity()
    }

    pub async fn save_x(self, cx: &Context) -> Record {
        expect_ok(self.save(cx).await)
    }

    pub async fn exec(self, cx: &Context) -> Result<()> {
        self.save(cx).await.map(|_| ())
    }

    pub async fn exec_x(self, cx: &Context) {
        expect_ok(self.exec(cx).await)
    }
}

/// Creates many entities with one executor call.
///
/// Every builder gets its defaults, privacy policies and checks; hooks are
/// only run by [`Create::save`].
#[derive(Debug)]
pub struct CreateBulk {
    client: Client,
    builders: Vec<Create>,
}

impl CreateBulk {
    pub(crate) fn new(client: Client, builders: Vec<Create>) -> CreateBulk {
        CreateBulk { client, builders }
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    /// Creates the entities, returning them in builder order.
    pub async fn save(mut self, cx: &Context) -> Result<Vec<Record>> {
        if self.builders.is_empty() {
            return Ok(vec![]);
        }

        let mut specs = Vec::with_capacity(self.builders.len());

        for builder in &mut self.builders {
            builder.inner.check_deferred()?;
            builder.defaults()?;

            let mutation = &mut builder.inner.mutation;
            privacy::eval_mutation(self.client.policies(mutation.type_id()), cx, mutation).await?;
            check::check_create(mutation)?;
            specs.push(spec::create_spec(mutation)?);
        }

        tracing::debug!(count = specs.len(), "create bulk");

        let res = self
            .client
            .exec(cx, Operation::CreateBulk(operation::CreateBulk { specs }))
            .await;

        for builder in &mut self.builders {
            builder.inner.mutation.mark_done();
        }

        let ty = self.builders[0].inner.mutation.ty();
        res.map_err(|err| save::storage_error(ty, err))?
            .into_records()
    }

    pub async fn save_x(self, cx: &Context) -> Vec<Record> {
        expect_ok(self.save(cx).await)
    }

    pub async fn exec(self, cx: &Context) -> Result<()> {
        self.save(cx).await.map(|_| ())
    }

    pub async fn exec_x(self, cx: &Context) {
        expect_ok(self.exec(cx).await)
    }
}
