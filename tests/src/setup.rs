use crate::{ExecLog, LoggingExecutor, MemoryExecutor};

use entgraph::{client, Client, Context, Record, Result, Value};
use entgraph_core::schema::{graph::Type, Schema, SchemaDecl, Step};
use indexmap::IndexMap;
use std::sync::{Arc, Once};

/// A client over a fresh in-memory store, with every executor call logged.
pub struct Test {
    pub client: Client,

    pub cx: Context,

    store: Arc<MemoryExecutor>,

    log: ExecLog,
}

/// Installs the `tracing` subscriber once per test binary. Filter with
/// `RUST_LOG`, e.g. `RUST_LOG=entgraph=debug`.
pub fn init_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

impl Test {
    #[track_caller]
    pub fn new(decl: &SchemaDecl) -> Test {
        Test::with(decl, |_| {})
    }

    /// Like [`Test::new`], letting `configure` register functions and
    /// middleware on the client builder first.
    #[track_caller]
    pub fn with(decl: &SchemaDecl, configure: impl FnOnce(&mut client::Builder)) -> Test {
        match Test::try_with(decl, configure) {
            Ok(test) => test,
            Err(err) => panic!("failed to build the test client: {err}"),
        }
    }

    pub fn try_with(decl: &SchemaDecl, configure: impl FnOnce(&mut client::Builder)) -> Result<Test> {
        init_tracing();

        let schema = Schema::from_decl(decl)?;
        let store = Arc::new(MemoryExecutor::new(&schema));
        let executor = LoggingExecutor::new(store.clone());
        let log = ExecLog::new(executor.ops_log_handle());

        let mut builder = Client::builder();
        configure(&mut builder);
        let client = builder.build_with_schema(schema, executor)?;

        Ok(Test {
            client,
            cx: Context::new(),
            store,
            log,
        })
    }

    pub fn log(&self) -> &ExecLog {
        &self.log
    }

    /// Rows stored in `table`, bypassing the client.
    pub fn rows(&self, table: &str) -> Vec<IndexMap<String, Value>> {
        self.store.rows(table)
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.store.row_count(table)
    }

    #[track_caller]
    pub fn ty(&self, name: &str) -> &Type {
        self.client
            .schema()
            .ty_by_name(name)
            .unwrap_or_else(|| panic!("no type named {name}"))
    }

    /// The shared step of `ty.edge`.
    #[track_caller]
    pub fn step(&self, ty: &str, edge: &str) -> Arc<Step> {
        let edge = self
            .ty(ty)
            .edge_by_name(edge)
            .unwrap_or_else(|| panic!("no edge {ty}.{edge}"));
        self.client.schema().step(edge.id).clone()
    }

    /// Creates an entity from `(field, value)` pairs, panicking on failure.
    pub async fn create(&self, ty: &str, fields: &[(&str, Value)]) -> Record {
        let mut create = self.client.create(ty).unwrap();
        for (name, value) in fields {
            create = create.set(name, value.clone());
        }
        create.save_x(&self.cx).await
    }
}
