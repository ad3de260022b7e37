mod check;

mod create;
pub use create::{Create, CreateBulk};

mod delete;
pub use delete::{Delete, DeleteOne};

mod query;
pub use query::{Order, Query};

mod save;

mod spec;

mod update;
pub use update::Update;

mod update_one;
pub use update_one::UpdateOne;

use crate::Mutation;

use entgraph_core::{Error, Result};

/// Setters record the first error and keep chaining; `save` returns it.
macro_rules! deferred_setters {
    ($builder:ident) => {
        impl $builder {
            /// The underlying mutation.
            pub fn mutation(&self) -> &$crate::Mutation {
                &self.inner.mutation
            }

            pub fn mutation_mut(&mut self) -> &mut $crate::Mutation {
                &mut self.inner.mutation
            }

            pub fn set(
                mut self,
                name: &str,
                value: impl Into<entgraph_core::stmt::Value>,
            ) -> $builder {
                let value = value.into();
                self.inner.apply(|m| m.set_field(name, value));
                self
            }

            pub fn set_edge_id(
                mut self,
                name: &str,
                id: impl Into<entgraph_core::stmt::Value>,
            ) -> $builder {
                let id = id.into();
                self.inner.apply(|m| m.set_edge_id(name, id));
                self
            }

            pub fn add_edge_ids<V: Into<entgraph_core::stmt::Value>>(
                mut self,
                name: &str,
                ids: impl IntoIterator<Item = V>,
            ) -> $builder {
                self.inner.apply(|m| m.add_edge_ids(name, ids));
                self
            }
        }
    };
    ($builder:ident, update) => {
        deferred_setters!($builder);

        impl $builder {
            pub fn add(mut self, name: &str, delta: impl Into<entgraph_core::stmt::Value>) -> $builder {
                let delta = delta.into();
                self.inner.apply(|m| m.add_field(name, delta));
                self
            }

            pub fn append(
                mut self,
                name: &str,
                elements: impl Into<entgraph_core::stmt::Value>,
            ) -> $builder {
                let elements = elements.into();
                self.inner.apply(|m| m.append_field(name, elements));
                self
            }

            pub fn clear(mut self, name: &str) -> $builder {
                self.inner.apply(|m| m.clear_field(name));
                self
            }

            pub fn remove_edge_ids<V: Into<entgraph_core::stmt::Value>>(
                mut self,
                name: &str,
                ids: impl IntoIterator<Item = V>,
            ) -> $builder {
                self.inner.apply(|m| m.remove_edge_ids(name, ids));
                self
            }

            pub fn clear_edge(mut self, name: &str) -> $builder {
                self.inner.apply(|m| m.clear_edge(name));
                self
            }

            pub fn where_(mut self, pred: $crate::Where) -> $builder {
                self.inner.mutation.predicates.push(pred);
                self
            }
        }

        impl $crate::Filter for $builder {
            fn where_(&mut self, pred: $crate::Where) {
                self.inner.mutation.predicates.push(pred);
            }

            fn predicates(&self) -> &[$crate::Where] {
                &self.inner.mutation.predicates
            }
        }
    };
}

use deferred_setters;

/// A mutation plus the first error raised by a setter.
#[derive(Debug)]
struct Inner {
    mutation: Mutation,
    err: Option<Error>,
}

impl Inner {
    fn new(mutation: Mutation) -> Inner {
        Inner {
            mutation,
            err: None,
        }
    }

    fn apply(&mut self, f: impl FnOnce(&mut Mutation) -> Result<()>) {
        if self.err.is_some() {
            return;
        }

        if let Err(err) = f(&mut self.mutation) {
            self.err = Some(err);
        }
    }

    /// Returns the deferred setter error, if any.
    fn check_deferred(&self) -> Result<()> {
        match &self.err {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Unwraps a builder result, panicking with the error. Backs the `_x`
/// variants of every builder.
#[track_caller]
fn expect_ok<T>(res: Result<T>) -> T {
    match res {
        Ok(value) => value,
        Err(err) => panic!("{err}"),
    }
}
