use entgraph::{driver::Operation, Value};
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{assert_err, assert_err_kind, assert_ok, fixtures, Test};

fn test() -> Test {
    Test::with(&fixtures::blog(), fixtures::blog_funcs)
}

#[tokio::test]
async fn create_fills_defaults_and_assigns_an_id() {
    let test = test();

    let user = test
        .client
        .create("User")
        .unwrap()
        .set("name", "a8m")
        .save_x(&test.cx)
        .await;

    assert_eq!(user.get("id"), &Value::Int(1));
    assert_eq!(user.get("name"), &Value::from("a8m"));
    assert_eq!(user.get("role"), &Value::Enum("member".to_string()));
    assert_eq!(user.get("created_at"), &fixtures::created_at());
    assert!(user.get("updated_at").is_null());
    assert!(user.get("age").is_null());
}

#[tokio::test]
async fn explicit_values_win_over_defaults() {
    let test = test();

    let mut create = test
        .client
        .create("User")
        .unwrap()
        .set("name", "a8m")
        .set("role", "admin");
    assert_ok!(create.defaults());

    let m = create.mutation();
    assert_eq!(m.field("role"), Some(Value::from("admin")));
    assert_eq!(m.field("created_at"), Some(fixtures::created_at()));
    assert_eq!(m.field("updated_at"), None);
}

#[tokio::test]
async fn create_spec_lists_set_columns() {
    let test = test();

    test.client
        .create("User")
        .unwrap()
        .set("name", "a8m")
        .set("labels", json!(["x"]))
        .exec_x(&test.cx)
        .await;

    let Operation::Create(spec) = test.log().last() else {
        panic!("expected a create operation")
    };

    let columns: Vec<_> = spec.fields.iter().map(|f| &f.column[..]).collect();
    assert_eq!(columns, ["name", "role", "created_at", "labels"]);
    assert_eq!(spec.node.table, "users");
    assert_eq!(spec.node.id.value(), None);
}

#[tokio::test]
async fn missing_required_fields_fail_validation() {
    let test = test();

    let err = test.client.create("User").unwrap().save(&test.cx).await;
    let err = assert_err_kind!(err, is_validation);
    assert_eq!(
        err.to_string(),
        "validation failed: missing required field \"User.name\""
    );
    assert_eq!(err.validation_name(), Some("name"));
    assert!(test.log().is_empty());
}

#[tokio::test]
async fn values_must_match_the_field_type() {
    let test = test();

    let err = test
        .client
        .create("User")
        .unwrap()
        .set("name", "a8m")
        .set("age", "thirty")
        .save(&test.cx)
        .await;

    let err = assert_err_kind!(err, is_validation);
    assert_eq!(
        err.to_string(),
        "validation failed: invalid value for field \"User.age\": expected int, got \"thirty\""
    );
}

#[tokio::test]
async fn null_needs_a_nillable_field() {
    let test = test();

    let err = test
        .client
        .create("User")
        .unwrap()
        .set("name", Value::Null)
        .save(&test.cx)
        .await;

    let err = assert_err_kind!(err, is_validation);
    assert_eq!(
        err.to_string(),
        "validation failed: field \"User.name\" is not nillable"
    );

    test.client
        .create("User")
        .unwrap()
        .set("name", "a8m")
        .set("nickname", Value::Null)
        .exec_x(&test.cx)
        .await;
}

#[tokio::test]
async fn enum_values_are_checked() {
    let test = test();

    let err = test
        .client
        .create("User")
        .unwrap()
        .set("name", "a8m")
        .set("role", "owner")
        .save(&test.cx)
        .await;

    let err = assert_err_kind!(err, is_validation);
    assert_eq!(err.validation_name(), Some("role"));
}

#[tokio::test]
async fn validator_errors_carry_the_field() {
    let test = test();

    let err = test
        .client
        .create("User")
        .unwrap()
        .set("name", "")
        .save(&test.cx)
        .await;

    let err = assert_err_kind!(err, is_validation);
    assert_eq!(
        err.to_string(),
        "validation failed: validator failed for field \"User.name\": \
         validation failed: name must not be empty"
    );
}

#[tokio::test]
async fn required_edges_must_be_set() {
    let test = Test::new(&fixtures::profiles(true));

    let err = test
        .client
        .create("User")
        .unwrap()
        .set("name", "a8m")
        .save(&test.cx)
        .await;

    let err = assert_err_kind!(err, is_validation);
    assert_eq!(
        err.to_string(),
        "validation failed: missing required edge \"User.profile\""
    );

    let profile = test.create("Profile", &[("bio", "hi".into())]).await;
    let user = test
        .client
        .create("User")
        .unwrap()
        .set("name", "a8m")
        .set_edge_id("profile", profile.get("id").clone())
        .save_x(&test.cx)
        .await;

    assert_eq!(
        test.rows("profiles")[0].get("user_profile"),
        Some(user.get("id"))
    );
}

#[tokio::test]
async fn unique_columns_reject_duplicates() {
    let test = test();
    test.create("User", &[("name", "a".into()), ("email", "a@entgo.io".into())])
        .await;

    let err = test
        .client
        .create("User")
        .unwrap()
        .set("name", "b")
        .set("email", "a@entgo.io")
        .save(&test.cx)
        .await;

    let err = assert_err_kind!(err, is_constraint);
    assert!(err.to_string().contains("users.email"), "{err}");
    assert_eq!(test.row_count("users"), 1);
}

#[tokio::test]
async fn create_with_owner_links_the_pet() {
    let test = test();
    let user = test.create("User", &[("name", "a8m".into())]).await;

    let pet = test
        .client
        .create("Pet")
        .unwrap()
        .set("name", "pedro")
        .set_edge_id("owner", user.get("id").clone())
        .save_x(&test.cx)
        .await;

    assert_eq!(pet.get("user_pets"), user.get("id"));

    let owner = test
        .client
        .query("Pet")
        .unwrap()
        .query_edge("owner")
        .only_x(&test.cx)
        .await;
    assert_eq!(owner.get("name"), &Value::from("a8m"));
}

#[tokio::test]
async fn bulk_create_is_one_executor_call() {
    let test = test();

    let builders = ["a8m", "nati", "rotem"].map(|name| {
        test.client
            .create("User")
            .unwrap()
            .set("name", name)
    });
    let users = test.client.create_bulk(builders).save_x(&test.cx).await;

    assert_eq!(test.log().len(), 1);
    let Operation::CreateBulk(bulk) = test.log().last() else {
        panic!("expected a bulk create")
    };
    assert_eq!(bulk.specs.len(), 3);

    let names: Vec<_> = users.iter().map(|user| user.get("name").clone()).collect();
    assert_eq!(names, [Value::from("a8m"), Value::from("nati"), Value::from("rotem")]);
    assert!(users.iter().all(|user| user.get("created_at") == &fixtures::created_at()));
}

#[tokio::test]
async fn bulk_create_stops_at_the_first_invalid_builder() {
    let test = test();

    let builders = vec![
        test.client.create("User").unwrap().set("name", "a8m"),
        test.client.create("User").unwrap(),
    ];
    let err = assert_err!(test.client.create_bulk(builders).save(&test.cx).await);

    assert!(err.is_validation());
    assert!(test.log().is_empty());
}

#[tokio::test]
async fn empty_bulk_create_does_nothing() {
    let test = test();

    let users = test.client.create_bulk(vec![]).save_x(&test.cx).await;
    assert!(users.is_empty());
    assert!(test.log().is_empty());
}
