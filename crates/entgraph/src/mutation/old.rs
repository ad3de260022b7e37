use super::{field_by_name, Mutation, Op};
use crate::{Query, Where};

use entgraph_core::{
    stmt::{Record, Value},
    Context, Error, Result,
};

impl Mutation {
    /// Returns the value the named field had before this update.
    ///
    /// Only update-one mutations of single-identity types have old values.
    /// The entity is loaded on first use; later calls, concurrent ones
    /// included, share that one lookup.
    pub async fn old_field(&self, cx: &Context, name: &str) -> Result<Value> {
        let ty = self.ty();

        if self.done {
            return Err(Error::usage(format!(
                "old value of {}.{name} requested after the mutation was executed",
                ty.name
            )));
        }

        if !self.op.is_update_one() {
            return Err(Error::usage(format!(
                "old_field is only allowed on update-one mutations; got {}",
                self.op
            )));
        }

        let field = field_by_name(ty, name)?;

        if ty.has_composite_id() {
            return Err(Error::usage(format!(
                "type {} has a composite identity and does not support old values",
                ty.name
            )));
        }

        let Some(id) = self.id[0].clone() else {
            return Err(Error::configuration(format!(
                "missing id for old value lookup ({}.{})",
                ty.name,
                ty.expect_id_field().name.app_name
            )));
        };

        let record = self
            .old
            .get_or_init(|| self.load_old(cx, id))
            .await
            .clone()?;

        Ok(record.get(field.column()).clone())
    }

    async fn load_old(&self, cx: &Context, id: Value) -> Result<Record> {
        tracing::debug!(ty = %self.ty().name, %id, "loading old values");

        Query::new(self.client.clone(), self.ty)
            .where_(Where::id_eq(id))
            .only(cx)
            .await
    }

    /// Ids of the entities this mutation applies to. Batch mutations run a
    /// query with the mutation's predicates.
    pub async fn ids(&self, cx: &Context) -> Result<Vec<Value>> {
        match self.op {
            Op::UpdateOne | Op::DeleteOne => Ok(self.id().into_iter().collect()),
            Op::Update | Op::Delete => {
                let mut query = Query::new(self.client.clone(), self.ty);
                for pred in &self.predicates {
                    query = query.where_(pred.clone());
                }
                query.ids(cx).await
            }
            Op::Create => Err(Error::usage("ids are not known before the entity is created")),
        }
    }
}
