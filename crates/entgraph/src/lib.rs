pub mod builder;
pub use builder::{Create, CreateBulk, Delete, DeleteOne, Order, Query, Update, UpdateOne};

pub mod client;
pub use client::{Client, TypeRef};

pub mod func;
pub use func::Funcs;

pub mod hook;
pub use hook::{Hook, Interceptor, Mutator, Outcome, Querier};

pub mod mutation;
pub use mutation::{Mutation, Op};

pub mod predicate;
pub use predicate::Where;

pub mod privacy;
pub use privacy::{Decision, Filter, Policy};

pub use entgraph_core::{
    async_trait,
    driver::{self, Context, Executor},
    schema::{self, Schema},
    stmt::{self, Direction, Record, Value},
    Error, Result,
};
