use entgraph::{driver::Operation, predicate::field_eq, Value};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tests::{fixtures, Test};

fn test() -> Test {
    Test::with(&fixtures::blog(), fixtures::blog_funcs)
}

#[tokio::test]
async fn create_with_tags_writes_join_rows() {
    let test = test();
    let t1 = test.create("Tag", &[("name", "rust".into())]).await;
    let t2 = test.create("Tag", &[("name", "graph".into())]).await;
    test.log().clear();

    let post = test
        .client
        .create("Post")
        .unwrap()
        .set("title", "entgraph")
        .add_edge_ids("tags", [t1.get("id").clone(), t2.get("id").clone()])
        .save_x(&test.cx)
        .await;

    assert_eq!(test.log().len(), 1);
    let Operation::Create(spec) = test.log().last() else {
        panic!("expected a create operation")
    };

    let step = test.step("Post", "tags");
    assert_eq!(spec.edges.len(), 2);
    for (edge, tag) in spec.edges.iter().zip([&t1, &t2]) {
        assert!(Arc::ptr_eq(&edge.step, &step));
        assert_eq!(edge.id.as_ref(), Some(tag.get("id")));
    }
    assert_eq!(step.edge_table, "post_tags");
    assert_eq!(step.columns, ["post_id", "tag_id"]);

    let rows = test.rows("post_tags");
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.get("post_id") == Some(post.get("id"))));
}

#[tokio::test]
async fn inverse_edges_read_the_same_join_rows() {
    let test = test();
    let tag = test.create("Tag", &[("name", "rust".into())]).await;

    for title in ["one", "two"] {
        test.client
            .create("Post")
            .unwrap()
            .set("title", title)
            .add_edge_ids("tags", [tag.get("id").clone()])
            .exec_x(&test.cx)
            .await;
    }

    let titles: Vec<_> = test
        .client
        .query("Tag")
        .unwrap()
        .where_(field_eq("name", "rust"))
        .query_edge("posts")
        .all_x(&test.cx)
        .await
        .iter()
        .map(|post| post.get("title").clone())
        .collect();

    assert_eq!(titles, [Value::from("one"), Value::from("two")]);
}

#[tokio::test]
async fn removing_tags_deletes_their_join_rows() {
    let test = test();
    let t1 = test.create("Tag", &[("name", "rust".into())]).await;
    let t2 = test.create("Tag", &[("name", "graph".into())]).await;

    let post = test
        .client
        .create("Post")
        .unwrap()
        .set("title", "entgraph")
        .add_edge_ids("tags", [t1.get("id").clone(), t2.get("id").clone()])
        .save_x(&test.cx)
        .await;

    test.client
        .update_one(&post)
        .unwrap()
        .remove_edge_ids("tags", [t1.get("id").clone()])
        .exec_x(&test.cx)
        .await;

    let rows = test.rows("post_tags");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("tag_id"), Some(t2.get("id")));
}

#[tokio::test]
async fn friendships_are_symmetric() {
    let test = test();
    let a8m = test.create("User", &[("name", "a8m".into())]).await;
    let nati = test.create("User", &[("name", "nati".into())]).await;

    test.client
        .update_one(&a8m)
        .unwrap()
        .add_edge_ids("friends", [nati.get("id").clone()])
        .exec_x(&test.cx)
        .await;

    assert_eq!(test.row_count("user_friends"), 2);

    let friends = test
        .client
        .query("User")
        .unwrap()
        .where_(field_eq("name", "nati"))
        .query_edge("friends")
        .only_x(&test.cx)
        .await;
    assert_eq!(friends.get("id"), a8m.get("id"));

    test.client
        .update_one(&nati)
        .unwrap()
        .remove_edge_ids("friends", [a8m.get("id").clone()])
        .exec_x(&test.cx)
        .await;

    assert_eq!(test.row_count("user_friends"), 0);
}

#[tokio::test]
async fn spouses_point_at_each_other() {
    let test = test();
    let a8m = test.create("User", &[("name", "a8m".into())]).await;
    let nati = test.create("User", &[("name", "nati".into())]).await;

    let a8m = test
        .client
        .update_one(&a8m)
        .unwrap()
        .set_edge_id("spouse", nati.get("id").clone())
        .save_x(&test.cx)
        .await;

    let rows = test.rows("users");
    assert_eq!(rows[0].get("user_spouse"), Some(nati.get("id")));
    assert_eq!(rows[1].get("user_spouse"), Some(a8m.get("id")));

    test.client
        .update_one(&a8m)
        .unwrap()
        .clear_edge("spouse")
        .exec_x(&test.cx)
        .await;

    let rows = test.rows("users");
    assert!(rows.iter().all(|row| row.get("user_spouse") == Some(&Value::Null)));
}

#[tokio::test]
async fn through_rows_carry_their_defaults() {
    let test = Test::with(&fixtures::likes(), fixtures::likes_funcs);
    let tweet = test.create("Tweet", &[("text", "hello".into())]).await;

    let user = test
        .client
        .create("User")
        .unwrap()
        .set("name", "a8m")
        .add_edge_ids("liked_tweets", [tweet.get("id").clone()])
        .save_x(&test.cx)
        .await;

    let rows = test.rows("likes");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("user_id"), Some(user.get("id")));
    assert_eq!(rows[0].get("tweet_id"), Some(tweet.get("id")));
    assert_eq!(rows[0].get("liked_at"), Some(&fixtures::created_at()));

    // The through type is reachable as an entity of its own.
    let likes = test
        .client
        .query("User")
        .unwrap()
        .query_edge("likes")
        .ids_x(&test.cx)
        .await;
    assert_eq!(
        likes,
        [Value::List(vec![user.get("id").clone(), tweet.get("id").clone()])]
    );

    let liked_by = test
        .client
        .query("Tweet")
        .unwrap()
        .query_edge("liked_users")
        .ids_x(&test.cx)
        .await;
    assert_eq!(liked_by, [user.get("id").clone()]);
}

#[tokio::test]
async fn through_entities_can_be_created_directly() {
    let test = Test::with(&fixtures::likes(), fixtures::likes_funcs);
    let user = test.create("User", &[("name", "a8m".into())]).await;
    let tweet = test.create("Tweet", &[("text", "hello".into())]).await;

    let like = test
        .client
        .create("Like")
        .unwrap()
        .set_edge_id("user", user.get("id").clone())
        .set_edge_id("tweet", tweet.get("id").clone())
        .save_x(&test.cx)
        .await;

    assert_eq!(like.get("liked_at"), &fixtures::created_at());

    let liked = test
        .client
        .query("User")
        .unwrap()
        .query_edge("liked_tweets")
        .only_id_x(&test.cx)
        .await;
    assert_eq!(&liked, tweet.get("id"));
}
