use crate::{Mutation, Where};

use entgraph_core::{async_trait, Context, Error, Result};

use std::sync::Arc;

/// A builder that accepts extra predicates.
///
/// Policies and hooks use it to narrow what a query or batch mutation
/// touches without knowing which builder they were handed.
pub trait Filter {
    /// Adds a predicate. All predicates are combined with `AND`.
    fn where_(&mut self, pred: Where);

    /// Predicates accumulated so far.
    fn predicates(&self) -> &[Where];
}

/// What a policy rule decided.
#[derive(Debug, Clone)]
pub enum Decision {
    /// Stop evaluating and let the operation through.
    Allow,

    /// Stop evaluating and fail with the given error.
    Deny(Error),

    /// Defer to the next rule.
    Skip,
}

impl Decision {
    pub fn deny(reason: impl Into<String>) -> Decision {
        Decision::Deny(Error::usage(format!("denied by policy: {}", reason.into())))
    }
}

/// A privacy rule. Both methods default to [`Decision::Skip`].
#[async_trait]
pub trait Policy: Send + Sync {
    async fn eval_mutation(&self, _cx: &Context, _mutation: &mut Mutation) -> Decision {
        Decision::Skip
    }

    async fn eval_query(&self, _cx: &Context, _query: &mut (dyn Filter + Send)) -> Decision {
        Decision::Skip
    }
}

pub type BoxPolicy = Arc<dyn Policy>;

/// Runs `policies` in order. The first `Allow` or `Deny` wins; when every
/// rule skips, the operation is allowed.
pub(crate) async fn eval_mutation(
    policies: &[BoxPolicy],
    cx: &Context,
    mutation: &mut Mutation,
) -> Result<()> {
    for policy in policies {
        match policy.eval_mutation(cx, mutation).await {
            Decision::Allow => return Ok(()),
            Decision::Deny(err) => return Err(err),
            Decision::Skip => {}
        }
    }

    Ok(())
}

pub(crate) async fn eval_query(
    policies: &[BoxPolicy],
    cx: &Context,
    query: &mut (dyn Filter + Send),
) -> Result<()> {
    for policy in policies {
        match policy.eval_query(cx, query).await {
            Decision::Allow => return Ok(()),
            Decision::Deny(err) => return Err(err),
            Decision::Skip => {}
        }
    }

    Ok(())
}
