use super::{expect_ok, save};
use crate::{Filter, Mutation, Where};

use entgraph_core::{Context, Result};

/// Deletes every entity matching the builder's predicates.
#[derive(Debug)]
pub struct Delete {
    mutation: Mutation,
}

/// Deletes one entity, identified by its id.
#[derive(Debug)]
pub struct DeleteOne {
    mutation: Mutation,
}

impl Delete {
    pub(crate) fn new(mutation: Mutation) -> Delete {
        Delete { mutation }
    }

    pub fn mutation(&self) -> &Mutation {
        &self.mutation
    }

    pub fn where_(mut self, pred: Where) -> Delete {
        self.mutation.predicates.push(pred);
        self
    }

    /// Runs the delete and returns the number of deleted entities.
    pub async fn exec(mut self, cx: &Context) -> Result<u64> {
        save::run(cx, &mut self.mutation).await?.into_count()
    }

    pub async fn exec_x(self, cx: &Context) -> u64 {
        expect_ok(self.exec(cx).await)
    }
}

impl Filter for Delete {
    fn where_(&mut self, pred: Where) {
        self.mutation.predicates.push(pred);
    }

    fn predicates(&self) -> &[Where] {
        &self.mutation.predicates
    }
}

impl DeleteOne {
    pub(crate) fn new(mutation: Mutation) -> DeleteOne {
        DeleteOne { mutation }
    }

    pub fn mutation(&self) -> &Mutation {
        &self.mutation
    }

    pub fn where_(mut self, pred: Where) -> DeleteOne {
        self.mutation.predicates.push(pred);
        self
    }

    /// Deletes the entity. Fails with `NotFound` if nothing was deleted.
    pub async fn exec(mut self, cx: &Context) -> Result<()> {
        save::run(cx, &mut self.mutation).await?.into_count()?;
        Ok(())
    }

    pub async fn exec_x(self, cx: &Context) {
        expect_ok(self.exec(cx).await)
    }
}
