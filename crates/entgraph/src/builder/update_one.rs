use super::{check, deferred_setters, expect_ok, save, Inner};
use crate::Mutation;

use entgraph_core::{stmt::Record, Context, Result};

/// Updates one entity, identified by its id.
#[derive(Debug)]
pub struct UpdateOne {
    inner: Inner,
}

deferred_setters!(UpdateOne, update);

impl UpdateOne {
    pub(crate) fn new(mutation: Mutation) -> UpdateOne {
        UpdateOne {
            inner: Inner::new(mutation),
        }
    }

    /// Fills fields that have an update default and were neither set nor
    /// cleared.
    pub fn defaults(&mut self) -> Result<()> {
        check::update_defaults(&mut self.inner.mutation)
    }

    pub fn check(&self) -> Result<()> {
        self.inner.check_deferred()?;
        check::check_update(&self.inner.mutation)
    }

    /// Runs the update and returns the entity as stored. Fails with
    /// `NotFound` if the entity does not exist.
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
