use entgraph::{
    async_trait, client,
    driver::{Operation, Response},
    hook::{self, BoxMutator, BoxQuerier},
    predicate::{field_eq, not},
    Context, Decision, Error, Filter, Hook, Interceptor, Mutation, Mutator, Op, Outcome, Policy,
    Querier, Result, Value, Where,
};
use entgraph_core::schema::naming;
use pretty_assertions::assert_eq;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use tests::{assert_err_kind, fixtures, Test};

type Calls = Arc<Mutex<Vec<String>>>;

/// Cards with every function registered.
fn cards(configure: impl FnOnce(&mut client::Builder)) -> Test {
    Test::with(&fixtures::cards(), |builder| {
        builder.default_fn(
            naming::update_default_symbol("card", "expires_at"),
            fixtures::updated_at,
        );
        configure(builder);
    })
}

struct Trace {
    name: &'static str,
    calls: Calls,
    next: BoxMutator,
}

#[async_trait]
impl Mutator for Trace {
    async fn mutate(&self, cx: &Context, m: &mut Mutation) -> Result<Outcome> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} before {}", self.name, m.op()));
        let res = self.next.mutate(cx, m).await;
        self.calls.lock().unwrap().push(format!("{} after", self.name));
        res
    }
}

fn trace(name: &'static str, calls: &Calls) -> Hook {
    let calls = calls.clone();
    hook::hook(move |next| Trace {
        name,
        calls: calls.clone(),
        next,
    })
}

/// Sets a zero balance on cards created without one.
struct ZeroBalance {
    next: BoxMutator,
}

#[async_trait]
impl Mutator for ZeroBalance {
    async fn mutate(&self, cx: &Context, m: &mut Mutation) -> Result<Outcome> {
        if m.op().is_create() && m.field("balance").is_none() {
            m.set_field("balance", 0)?;
        }
        self.next.mutate(cx, m).await
    }
}

/// Rejects deletes without calling the next mutator.
struct NoDeletes {
    next: BoxMutator,
}

#[async_trait]
impl Mutator for NoDeletes {
    async fn mutate(&self, cx: &Context, m: &mut Mutation) -> Result<Outcome> {
        if m.op().is_delete() {
            return Err(Error::usage(format!(
                "{} entities cannot be deleted",
                m.type_name()
            )));
        }
        self.next.mutate(cx, m).await
    }
}

/// Frozen cards cannot be written, and are hidden from queries.
struct FrozenCards;

#[async_trait]
impl Policy for FrozenCards {
    async fn eval_mutation(&self, _cx: &Context, m: &mut Mutation) -> Decision {
        if m.field("frozen") == Some(Value::Bool(true)) {
            return Decision::deny("frozen cards are read-only");
        }

        Decision::Skip
    }

    async fn eval_query(&self, _cx: &Context, query: &mut (dyn Filter + Send)) -> Decision {
        query.where_(not(field_eq("frozen", true)));
        Decision::Skip
    }
}

/// Narrows batch updates to the entities matching a predicate.
struct UpdateOnly(Where);

#[async_trait]
impl Policy for UpdateOnly {
    async fn eval_mutation(&self, _cx: &Context, m: &mut Mutation) -> Decision {
        if m.op() == Op::Update {
            m.where_(self.0.clone());
        }
        Decision::Skip
    }
}

struct AllowAll;

#[async_trait]
impl Policy for AllowAll {
    async fn eval_mutation(&self, _cx: &Context, _m: &mut Mutation) -> Decision {
        Decision::Allow
    }
}

struct CountQueries {
    count: Arc<AtomicUsize>,
    next: BoxQuerier,
}

#[async_trait]
impl Querier for CountQueries {
    async fn query(&self, cx: &Context, op: Operation) -> Result<Response> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.next.query(cx, op).await
    }
}

fn count_queries(count: &Arc<AtomicUsize>) -> Interceptor {
    let count = count.clone();
    hook::interceptor(move |next| CountQueries {
        count: count.clone(),
        next,
    })
}

#[tokio::test]
async fn hooks_wrap_in_registration_order() {
    let calls = Calls::default();
    let test = cards(|builder| {
        builder
            .hook("Card", trace("outer", &calls))
            .hook("Card", trace("inner", &calls));
    });

    test.create("Card", &[("number", "4111".into())]).await;

    assert_eq!(
        *calls.lock().unwrap(),
        ["outer before create", "inner before create", "inner after", "outer after"]
    );

    // Hooks are registered per type.
    calls.lock().unwrap().clear();
    test.create("User", &[("name", "a8m".into())]).await;
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn hooks_can_change_the_mutation() {
    let test = cards(|builder| {
        builder.hook("Card", hook::hook(|next| ZeroBalance { next }));
    });

    let card = test.create("Card", &[("number", "4111".into())]).await;
    assert_eq!(card.get("balance"), &Value::Int(0));

    let card = test
        .create("Card", &[("number", "4222".into()), ("balance", 10.into())])
        .await;
    assert_eq!(card.get("balance"), &Value::Int(10));
}

#[tokio::test]
async fn hooks_can_stop_a_mutation() {
    let test = cards(|builder| {
        builder.hook("Card", hook::hook(|next| NoDeletes { next }));
    });

    test.create("Card", &[("number", "4111".into())]).await;
    test.log().clear();

    let err = test.client.delete("Card").unwrap().exec(&test.cx).await;
    let err = assert_err_kind!(err, is_usage);
    assert_eq!(err.to_string(), "Card entities cannot be deleted");
    assert!(test.log().is_empty());
    assert_eq!(test.row_count("cards"), 1);
}

#[tokio::test]
async fn hooks_read_old_values() {
    let seen = Arc::new(Mutex::new(vec![]));

    struct Audit {
        seen: Arc<Mutex<Vec<Value>>>,
        next: BoxMutator,
    }

    #[async_trait]
    impl Mutator for Audit {
        async fn mutate(&self, cx: &Context, m: &mut Mutation) -> Result<Outcome> {
            if m.op().is_update_one() {
                let old = m.old_field(cx, "balance").await?;
                self.seen.lock().unwrap().push(old);
            }
            self.next.mutate(cx, m).await
        }
    }

    let test = {
        let seen = seen.clone();
        cards(move |builder| {
            builder.hook(
                "Card",
                hook::hook(move |next| Audit {
                    seen: seen.clone(),
                    next,
                }),
            );
        })
    };

    let card = test
        .create("Card", &[("number", "4111".into()), ("balance", 5.into())])
        .await;
    let card = test
        .client
        .update_one(&card)
        .unwrap()
        .add("balance", 10)
        .save_x(&test.cx)
        .await;

    assert_eq!(card.get("balance"), &Value::Int(15));
    assert_eq!(card.get("expires_at"), &fixtures::updated_at());
    assert_eq!(*seen.lock().unwrap(), [Value::Int(5)]);
}

#[tokio::test]
async fn policies_deny_mutations() {
    let test = cards(|builder| {
        builder.policy("Card", FrozenCards);
    });

    let err = test
        .client
        .create("Card")
        .unwrap()
        .set("number", "4111")
        .set("frozen", true)
        .save(&test.cx)
        .await;

    let err = assert_err_kind!(err, is_usage);
    assert_eq!(err.to_string(), "denied by policy: frozen cards are read-only");
    assert!(test.log().is_empty());
}

#[tokio::test]
async fn the_first_decisive_policy_wins() {
    let test = cards(|builder| {
        builder.policy("Card", AllowAll).policy("Card", FrozenCards);
    });

    let card = test
        .client
        .create("Card")
        .unwrap()
        .set("number", "4111")
        .set("frozen", true)
        .save_x(&test.cx)
        .await;

    assert_eq!(card.get("frozen"), &Value::Bool(true));
}

#[tokio::test]
async fn policies_run_for_bulk_creates() {
    let test = cards(|builder| {
        builder.policy("Card", FrozenCards);
    });

    let builders = vec![
        test.client.create("Card").unwrap().set("number", "4111"),
        test.client
            .create("Card")
            .unwrap()
            .set("number", "4222")
            .set("frozen", true),
    ];

    let err = test.client.create_bulk(builders).save(&test.cx).await;
    assert_err_kind!(err, is_usage);
    assert!(test.log().is_empty());
}

#[tokio::test]
async fn query_policies_narrow_every_read() {
    // Writes are always allowed; reads still go through `FrozenCards`.
    let test = cards(|builder| {
        builder.policy("Card", AllowAll).policy("Card", FrozenCards);
    });

    test.create("Card", &[("number", "4111".into())]).await;
    test.create("Card", &[("number", "4222".into()), ("frozen", true.into())])
        .await;
    test.create("Card", &[("number", "4333".into()), ("frozen", false.into())])
        .await;

    let count = test.client.query("Card").unwrap().count_x(&test.cx).await;
    assert_eq!(count, 2);

    let numbers: Vec<_> = test
        .client
        .query("Card")
        .unwrap()
        .all_x(&test.cx)
        .await
        .iter()
        .map(|card| card.get("number").clone())
        .collect();
    assert_eq!(numbers, [Value::from("4111"), Value::from("4333")]);

    let err = test.client.get(&test.cx, "Card", 2).await;
    assert_err_kind!(err, is_not_found);
}

#[tokio::test]
async fn mutation_policies_narrow_batch_updates() {
    let test = cards(|builder| {
        builder.policy("Card", UpdateOnly(field_eq("balance", 0)));
    });

    for (number, balance) in [("4111", 0), ("4222", 5), ("4333", 0)] {
        test.create("Card", &[("number", number.into()), ("balance", balance.into())])
            .await;
    }

    let updated = test
        .client
        .update("Card")
        .unwrap()
        .set("frozen", true)
        .save_x(&test.cx)
        .await;
    assert_eq!(updated, 2);

    let frozen: Vec<_> = test
        .rows("cards")
        .iter()
        .map(|row| row.get("frozen").cloned().unwrap_or_default())
        .collect();
    assert_eq!(frozen, [Value::Bool(true), Value::Null, Value::Bool(true)]);
}

#[tokio::test]
async fn interceptors_see_queries_of_their_type() {
    let count = Arc::new(AtomicUsize::new(0));
    let test = cards(|builder| {
        builder.interceptor("Card", count_queries(&count));
    });

    test.create("Card", &[("number", "4111".into())]).await;
    assert_eq!(count.load(Ordering::SeqCst), 0);

    let total = test.client.query("Card").unwrap().count_x(&test.cx).await;
    assert_eq!(total, 1);
    test.client.query("Card").unwrap().all_x(&test.cx).await;
    assert_eq!(count.load(Ordering::SeqCst), 2);

    test.client.query("User").unwrap().all_x(&test.cx).await;
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn registered_middleware_is_counted_on_the_type() {
    let calls = Calls::default();
    let count = Arc::new(AtomicUsize::new(0));
    let test = cards(|builder| {
        builder
            .hook("Card", trace("outer", &calls))
            .hook("Card", trace("inner", &calls))
            .interceptor("Card", count_queries(&count))
            .policy("Card", AllowAll);
    });

    let card = test.ty("Card");
    assert_eq!((card.hooks, card.interceptors, card.policies), (2, 1, 1));
    assert!(card.runtime_checked());

    let user = test.ty("User");
    assert_eq!((user.hooks, user.interceptors, user.policies), (0, 0, 0));
    assert!(!user.runtime_checked());
}

#[tokio::test]
async fn types_without_middleware_resolve_functions_at_build() {
    let err = Test::try_with(&fixtures::cards(), |_| {}).map(|_| ());

    let err = assert_err_kind!(err, is_configuration);
    assert_eq!(
        err.to_string(),
        "uninitialized card::update_default_expires_at \
         (function was never registered on the client)"
    );
}

#[tokio::test]
async fn functions_of_checked_types_are_resolved_at_save() {
    // Building succeeds: the hook runs user code before save.
    let calls = Calls::default();
    let test = Test::with(&fixtures::cards(), |builder| {
        builder.hook("Card", trace("trace", &calls));
    });
    test.create("Card", &[("number", "4111".into())]).await;
    test.log().clear();

    let err = test
        .client
        .update("Card")
        .unwrap()
        .set("balance", 1)
        .save(&test.cx)
        .await;

    let err = assert_err_kind!(err, is_configuration);
    assert_eq!(
        err.to_string(),
        "uninitialized card::update_default_expires_at \
         (function was never registered on the client)"
    );
    assert!(test.log().is_empty());
}

#[tokio::test]
async fn delete_mutations_reject_field_changes() {
    struct Rename {
        next: BoxMutator,
    }

    #[async_trait]
    impl Mutator for Rename {
        async fn mutate(&self, cx: &Context, m: &mut Mutation) -> Result<Outcome> {
            m.set_field("number", "0000")?;
            self.next.mutate(cx, m).await
        }
    }

    let test = cards(|builder| {
        builder.hook("Card", hook::hook(|next| Rename { next }));
    });

    let err = test.client.delete("Card").unwrap().exec(&test.cx).await;
    let err = assert_err_kind!(err, is_usage);
    assert_eq!(
        err.to_string(),
        "cannot change field Card.number in a delete mutation"
    );
}
