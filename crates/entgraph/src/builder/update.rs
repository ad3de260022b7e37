use super::{check, deferred_setters, expect_ok, save, Inner};
use crate::Mutation;

use entgraph_core::{Context, Result};

/// Updates every entity matching the builder's predicates.
#[derive(Debug)]
pub struct Update {
    inner: Inner,
}

deferred_setters!(Update, update);

impl Update {
    pub(crate) fn new(mutation: Mutation) -> Update {
        Update {
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

    /// Runs the update and returns the number of affected entities.
    pub async fn save(mut self, cx: &Context) -> Result<u64> {
        self.inner.check_deferred()?;
        self.defaults()?;
        save::run(cx, &mut self.inner.mutation).await?.into_count()
    }

    pub async fn save_x(self, cx: &Context) -> u64 {
        expect_ok(self.save(cx).await)
    }

    pub async fn exec(self, cx: &Context) -> Result<()> {
        self.save(cx).await.map(|_| ())
    }

    pub async fn exec_x(self, cx: &Context) {
        expect_ok(self.exec(cx).await)
    }
}
