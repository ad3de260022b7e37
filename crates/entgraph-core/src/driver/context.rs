use tokio_util::sync::CancellationToken;

/// Per-call context handed through to the executor untouched.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancel: CancellationToken,
}

impl Context {
    pub fn new() -> Context {
        Context::default()
    }

    pub fn with_cancellation(cancel: CancellationToken) -> Context {
        Context { cancel }
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
