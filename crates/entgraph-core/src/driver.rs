mod context;
pub use context::Context;

mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use crate::async_trait;

use std::fmt::Debug;

/// Executes assembled operation specs against storage.
///
/// The engine performs no I/O itself. Executors report missing rows with
/// [`Error::record_not_found`](crate::Error::record_not_found) and constraint
/// violations with
/// [`Error::driver_constraint`](crate::Error::driver_constraint) so builders
/// can re-wrap them into domain errors.
#[async_trait]
pub trait Executor: Debug + Send + Sync + 'static {
    /// Execute an operation.
    async fn exec(&self, cx: &Context, op: Operation) -> crate::Result<Response>;
}
