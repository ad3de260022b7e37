use super::{Client, Shared, TypeRef};
use crate::{func, hook::Hook, privacy::BoxPolicy, Funcs, Interceptor, Policy};

use entgraph_core::{
    schema::{self, graph::Type, naming, SchemaDecl},
    stmt::Value,
    Executor, Result, Schema,
};

use indexmap::IndexMap;
use std::sync::Arc;

#[derive(Default)]
pub struct Builder {
    /// Schema builder
    core: schema::Builder,

    funcs: Funcs,

    /// Middleware, keyed by type name until the schema is built
    hooks: Vec<(String, Hook)>,
    interceptors: Vec<(String, Interceptor)>,
    policies: Vec<(String, BoxPolicy)>,
}

impl Builder {
    /// Set the table name prefix for all tables
    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.core.table_name_prefix(prefix);
        self
    }

    pub fn validator(
        &mut self,
        symbol: impl Into<String>,
        f: impl Fn(&Value) -> Result<()> + Send + Sync + 'static,
    ) -> &mut Self {
        self.funcs.validator(symbol, f);
        self
    }

    pub fn default_fn(
        &mut self,
        symbol: impl Into<String>,
        f: impl Fn() -> Value + Send + Sync + 'static,
    ) -> &mut Self {
        self.funcs.default_fn(symbol, f);
        self
    }

    pub fn hook(&mut self, ty: &str, hook: Hook) -> &mut Self {
        self.hooks.push((ty.to_string(), hook));
        self
    }

    pub fn interceptor(&mut self, ty: &str, interceptor: Interceptor) -> &mut Self {
        self.interceptors.push((ty.to_string(), interceptor));
        self
    }

    pub fn policy(&mut self, ty: &str, policy: impl Policy + 'static) -> &mut Self {
        self.policies.push((ty.to_string(), Arc::new(policy)));
        self
    }

    /// Builds the schema from its declarations and returns a client running
    /// operations through `executor`.
    pub fn build(&self, decl: &SchemaDecl, executor: impl Executor) -> Result<Client> {
        let schema = self.core.build(decl)?;
        self.build_with_schema(schema, executor)
    }

    /// Returns a client for an already built schema.
    pub fn build_with_schema(&self, mut schema: Schema, executor: impl Executor) -> Result<Client> {
        let mut hooks = IndexMap::<_, Vec<_>>::new();
        for (name, hook) in &self.hooks {
            let ty = name.as_str().resolve(&schema)?;
            hooks.entry(ty).or_default().push(hook.clone());
        }

        let mut interceptors = IndexMap::<_, Vec<_>>::new();
        for (name, interceptor) in &self.interceptors {
            let ty = name.as_str().resolve(&schema)?;
            interceptors
                .entry(ty)
                .or_default()
                .push(interceptor.clone());
        }

        let mut policies = IndexMap::<_, Vec<_>>::new();
        for (name, policy) in &self.policies {
            let ty = name.as_str().resolve(&schema)?;
            policies.entry(ty).or_default().push(policy.clone());
        }

        // Middleware counts are taken from the registrations above.
        let ids: Vec<_> = schema.graph.types().map(|ty| ty.id).collect();
        for id in ids {
            let ty = schema.graph.ty_mut(id);
            ty.hooks = hooks.get(&id).map_or(0, Vec::len);
            ty.interceptors = interceptors.get(&id).map_or(0, Vec::len);
            ty.policies = policies.get(&id).map_or(0, Vec::len);
        }

        // Types without hooks or policies run no user code before save, so
        // their functions must all be present up front.
        for ty in schema.graph.types() {
            if !ty.runtime_checked() {
                verify_funcs(&self.funcs, ty)?;
            }
        }

        let schema = Arc::new(schema);

        Ok(Client {
            shared: Arc::new(Shared {
                schema,
                executor: Arc::new(executor),
                funcs: self.funcs.clone(),
                hooks,
                interceptors,
                policies,
            }),
        })
    }
}

/// Checks that every default, update-default and validator symbol of `ty`
/// is registered.
pub(crate) fn verify_funcs(funcs: &Funcs, ty: &Type) -> Result<()> {
    let label = ty.label();

    for field in &ty.fields {
        let name = &field.name.app_name;

        if field.default {
            let symbol = naming::default_symbol(&label, name);
            if !funcs.has_default(&symbol) {
                return Err(func::uninitialized(&symbol));
            }
        }

        if field.update_default {
            let symbol = naming::update_default_symbol(&label, name);
            if !funcs.has_default(&symbol) {
                return Err(func::uninitialized(&symbol));
            }
        }

        if field.validators > 0 {
            let symbol = naming::validator_symbol(&label, name);
            if !funcs.has_validator(&symbol) {
                return Err(func::uninitialized(&symbol));
            }
        }
    }

    Ok(())
}
