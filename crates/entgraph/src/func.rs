use entgraph_core::{stmt::Value, Error, Result};

use indexmap::IndexMap;
use std::{fmt, sync::Arc};

pub type ValidatorFn = Arc<dyn Fn(&Value) -> Result<()> + Send + Sync>;
pub type DefaultFn = Arc<dyn Fn() -> Value + Send + Sync>;

/// Validator and default-value functions, registered by symbol.
///
/// Symbols are derived from the schema (see
/// [`naming::default_symbol`](entgraph_core::schema::naming::default_symbol)
/// and friends), e.g. `user::default_created_at` or `user::name_validator`.
#[derive(Clone, Default)]
pub struct Funcs {
    validators: IndexMap<String, ValidatorFn>,
    defaults: IndexMap<String, DefaultFn>,
}

impl Funcs {
    pub fn new() -> Funcs {
        Funcs::default()
    }

    pub fn validator(
        &mut self,
        symbol: impl Into<String>,
        f: impl Fn(&Value) -> Result<()> + Send + Sync + 'static,
    ) -> &mut Self {
        self.validators.insert(symbol.into(), Arc::new(f));
        self
    }

    /// Registers a default function. Used for both create defaults and
    /// update defaults; the symbol tells them apart.
    pub fn default_fn(
        &mut self,
        symbol: impl Into<String>,
        f: impl Fn() -> Value + Send + Sync + 'static,
    ) -> &mut Self {
        self.defaults.insert(symbol.into(), Arc::new(f));
        self
    }

    pub fn has_validator(&self, symbol: &str) -> bool {
        self.validators.contains_key(symbol)
    }

    pub fn has_default(&self, symbol: &str) -> bool {
        self.defaults.contains_key(symbol)
    }

    /// Calls the default function registered under `symbol`.
    pub fn call_default(&self, symbol: &str) -> Result<Value> {
        match self.defaults.get(symbol) {
            Some(f) => Ok(f()),
            None => Err(uninitialized(symbol)),
        }
    }

    /// Runs the validator registered under `symbol`. The validator's error is
    /// returned verbatim; callers add the field context.
    pub fn validate(&self, symbol: &str, value: &Value) -> Result<()> {
        match self.validators.get(symbol) {
            Some(f) => f(value),
            None => Err(uninitialized(symbol)),
        }
    }
}

pub(crate) fn uninitialized(symbol: &str) -> Error {
    Error::configuration(format!(
        "uninitialized {symbol} (function was never registered on the client)"
    ))
}

impl fmt::Debug for Funcs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Funcs")
            .field("validators", &self.validators.keys().collect::<Vec<_>>())
            .field("defaults", &self.defaults.keys().collect::<Vec<_>>())
            .finish()
    }
}
