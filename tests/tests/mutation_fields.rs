use entgraph::Value;
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{assert_err, assert_ok, fixtures, Test};

fn test() -> Test {
    Test::with(&fixtures::blog(), fixtures::blog_funcs)
}

#[test]
fn add_after_set_keeps_both() {
    let test = test();
    let mut update = test.client.update("User").unwrap();
    let m = update.mutation_mut();

    assert_ok!(m.set_field("age", 5));
    assert_ok!(m.add_field("age", 3));

    assert_eq!(m.field("age"), Some(Value::Int(5)));
    assert_eq!(m.added_field("age"), Some(Value::Int(3)));
    assert_eq!(m.fields(), ["age"]);
    assert_eq!(m.added_fields(), ["age"]);
}

#[test]
fn set_after_add_drops_the_delta() {
    let test = test();
    let mut update = test.client.update("User").unwrap();
    let m = update.mutation_mut();

    assert_ok!(m.add_field("age", 3));
    assert_ok!(m.add_field("age", 4));
    assert_eq!(m.added_field("age"), Some(Value::Int(7)));

    assert_ok!(m.set_field("age", 5));
    assert_eq!(m.field("age"), Some(Value::Int(5)));
    assert_eq!(m.added_field("age"), None);
    assert!(m.added_fields().is_empty());
}

#[test]
fn add_requires_a_numeric_field() {
    let test = test();
    let mut update = test.client.update("User").unwrap();

    let err = assert_err!(update.mutation_mut().add_field("name", 1));
    assert!(err.is_usage());
    assert_eq!(err.to_string(), "field User.name does not support add");
}

#[test]
fn add_deltas_match_the_field_type() {
    let test = test();
    let mut update = test.client.update("User").unwrap();
    let m = update.mutation_mut();

    let err = assert_err!(m.add_field("age", 1.5));
    assert!(err.is_validation());
    assert_eq!(err.validation_name(), Some("age"));

    let err = assert_err!(m.add_field("age", "x"));
    assert!(err.is_validation());
    assert_eq!(err.validation_name(), Some("age"));

    assert_eq!(m.added_field("age"), None);
    assert!(m.added_fields().is_empty());
}

#[test]
fn add_overflow_keeps_the_previous_delta() {
    let test = test();
    let mut update = test.client.update("User").unwrap();
    let m = update.mutation_mut();

    assert_ok!(m.add_field("age", i64::MAX));
    let err = assert_err!(m.add_field("age", 1));
    assert!(err.is_validation());
    assert_eq!(err.validation_name(), Some("age"));

    assert_eq!(m.added_field("age"), Some(Value::Int(i64::MAX)));

    assert_ok!(m.add_field("age", -1));
    assert_eq!(m.added_field("age"), Some(Value::Int(i64::MAX - 1)));
}

#[test]
fn append_requires_a_json_array() {
    let test = test();
    let mut update = test.client.update("User").unwrap();
    let m = update.mutation_mut();

    let err = assert_err!(m.append_field("labels", json!({"a": 1})));
    assert!(err.is_validation());
    assert_eq!(err.validation_name(), Some("labels"));
    assert_eq!(m.appended_field("labels"), None);
}

#[test]
fn append_accumulates_and_keeps_the_set_value() {
    let test = test();
    let mut update = test.client.update("User").unwrap();
    let m = update.mutation_mut();

    assert_ok!(m.set_field("labels", json!(["a"])));
    assert_ok!(m.append_field("labels", json!(["b"])));
    assert_ok!(m.append_field("labels", json!(["c", "d"])));

    assert_eq!(m.field("labels"), Some(Value::Json(json!(["a"]))));
    assert_eq!(m.appended_field("labels"), Some(Value::Json(json!(["b", "c", "d"]))));
    assert_eq!(m.appended_fields(), ["labels"]);

    let err = assert_err!(m.append_field("name", json!(["x"])));
    assert!(err.is_usage());
}

#[test]
fn clear_lists_the_field_and_reset_forgets_it() {
    let test = test();
    let mut update = test.client.update("User").unwrap();
    let m = update.mutation_mut();

    assert_ok!(m.set_field("nickname", "a8m"));
    assert_ok!(m.clear_field("nickname"));

    assert_eq!(m.cleared_fields(), ["nickname"]);
    assert!(m.field_cleared("nickname"));
    assert_eq!(m.field("nickname"), None);

    assert_ok!(m.reset_field("nickname"));
    assert!(m.cleared_fields().is_empty());
    assert!(!m.field_cleared("nickname"));
}

#[test]
fn set_after_clear_wins() {
    let test = test();
    let mut update = test.client.update("User").unwrap();
    let m = update.mutation_mut();

    assert_ok!(m.clear_field("nickname"));
    assert_ok!(m.set_field("nickname", "rotemtam"));

    assert!(!m.field_cleared("nickname"));
    assert_eq!(m.field("nickname"), Some(Value::from("rotemtam")));
}

#[test]
fn clear_requires_a_nillable_field() {
    let test = test();
    let mut update = test.client.update("User").unwrap();

    let err = assert_err!(update.mutation_mut().clear_field("name"));
    assert!(err.is_usage());
    assert_eq!(err.to_string(), "field User.name is not nillable");
}

#[test]
fn immutable_fields_reject_updates() {
    let test = test();

    let mut update = test.client.update("User").unwrap();
    let err = assert_err!(update.mutation_mut().set_field("created_at", fixtures::updated_at()));
    assert!(err.is_usage());
    assert_eq!(err.to_string(), "field User.created_at is immutable");

    let mut create = test.client.create("User").unwrap();
    assert_ok!(create.mutation_mut().set_field("created_at", fixtures::created_at()));
}

#[test]
fn identity_is_not_updatable() {
    let test = test();
    let mut update = test.client.update_one_id("User", 1).unwrap();

    let err = assert_err!(update.mutation_mut().set_field("id", 2));
    assert!(err.is_usage());
    assert_eq!(err.to_string(), "identity field User.id cannot be updated");
}

#[test]
fn unknown_fields_are_usage_errors() {
    let test = test();
    let mut update = test.client.update("User").unwrap();

    let err = assert_err!(update.mutation_mut().set_field("nope", 1));
    assert!(err.is_usage());
    assert_eq!(update.mutation().field("nope"), None);
}

#[tokio::test]
async fn setter_errors_surface_on_save() {
    let test = test();

    let err = test
        .client
        .update("User")
        .unwrap()
        .add("name", 1)
        .set("age", 4)
        .save(&test.cx)
        .await
        .unwrap_err();

    assert!(err.is_usage());
    assert!(test.log().is_empty());
}
