//! Schemas shared by the integration tests.

use entgraph::{client, Error, Value};
use entgraph_core::schema::{naming, EdgeDecl, FieldDecl, SchemaDecl, TypeDecl};

use chrono::{DateTime, Utc};

/// A fixed creation timestamp, so records compare deterministically.
pub fn created_at() -> Value {
    Value::Time(timestamp(1_700_000_000))
}

/// The timestamp update defaults produce.
pub fn updated_at() -> Value {
    Value::Time(timestamp(1_700_086_400))
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

/// Users with pets, a profile, friends and a spouse; posts with tags.
pub fn blog() -> SchemaDecl {
    SchemaDecl::new()
        .ty(TypeDecl::new("User")
            .field(FieldDecl::string("name").validators(1))
            .field(FieldDecl::int("age").optional())
            .field(FieldDecl::string("nickname").optional().nillable())
            .field(FieldDecl::string("email").optional().unique())
            .field(FieldDecl::enumeration("role", &["admin", "member"]).with_default())
            .field(FieldDecl::time("created_at").immutable().with_default())
            .field(FieldDecl::time("updated_at").optional().with_update_default())
            .field(FieldDecl::json("labels").optional().nillable())
            .edge(EdgeDecl::to("pets", "Pet"))
            .edge(EdgeDecl::to("profile", "Profile").unique())
            .edge(EdgeDecl::to("friends", "User"))
            .edge(EdgeDecl::to("spouse", "User").unique()))
        .ty(TypeDecl::new("Pet")
            .field(FieldDecl::string("name"))
            .field(FieldDecl::int("weight").optional())
            .edge(EdgeDecl::inverse("owner", "User", "pets").unique()))
        .ty(TypeDecl::new("Profile")
            .field(FieldDecl::string("bio"))
            .edge(EdgeDecl::inverse("owner", "User", "profile").unique()))
        .ty(TypeDecl::new("Post")
            .field(FieldDecl::string("title"))
            .edge(EdgeDecl::to("tags", "Tag")))
        .ty(TypeDecl::new("Tag")
            .field(FieldDecl::string("name"))
            .edge(EdgeDecl::inverse("posts", "Post", "tags")))
}

/// Registers the default and validator functions [`blog`] declares.
pub fn blog_funcs(builder: &mut client::Builder) {
    builder
        .default_fn(naming::default_symbol("user", "role"), || {
            Value::Enum("member".to_string())
        })
        .default_fn(naming::default_symbol("user", "created_at"), created_at)
        .default_fn(naming::update_default_symbol("user", "updated_at"), updated_at)
        .validator(naming::validator_symbol("user", "name"), |value| {
            match value.as_str() {
                Some("") => Err(Error::validation("name", "name must not be empty")),
                _ => Ok(()),
            }
        });
}

/// Users and their profile. `required` marks `User.profile` as required.
pub fn profiles(required: bool) -> SchemaDecl {
    let mut profile = EdgeDecl::to("profile", "Profile").unique();
    if required {
        profile = profile.required();
    }

    SchemaDecl::new()
        .ty(TypeDecl::new("User")
            .field(FieldDecl::string("name"))
            .edge(profile))
        .ty(TypeDecl::new("Profile")
            .field(FieldDecl::string("bio"))
            .edge(EdgeDecl::inverse("owner", "User", "profile").unique()))
}

/// Users liking tweets through the `Like` type, which carries a
/// defaulted `liked_at` field.
pub fn likes() -> SchemaDecl {
    SchemaDecl::new()
        .ty(TypeDecl::new("User")
            .field(FieldDecl::string("name"))
            .edge(EdgeDecl::to("liked_tweets", "Tweet").through("likes", "Like")))
        .ty(TypeDecl::new("Tweet")
            .field(FieldDecl::string("text"))
            .edge(EdgeDecl::inverse("liked_users", "User", "liked_tweets")))
        .ty(TypeDecl::new("Like")
            .composite_id(&["user_id", "tweet_id"])
            .field(FieldDecl::int("user_id"))
            .field(FieldDecl::int("tweet_id"))
            .field(FieldDecl::time("liked_at").with_default())
            .edge(EdgeDecl::to("user", "User").unique().required().field("user_id"))
            .edge(EdgeDecl::to("tweet", "Tweet").unique().required().field("tweet_id")))
}

pub fn likes_funcs(builder: &mut client::Builder) {
    builder.default_fn(naming::default_symbol("like", "liked_at"), created_at);
}

/// Cards. Tests register their own hooks and policies, which defer
/// function checks to save time.
pub fn cards() -> SchemaDecl {
    SchemaDecl::new()
        .ty(TypeDecl::new("User")
            .field(FieldDecl::string("name"))
            .edge(EdgeDecl::to("cards", "Card")))
        .ty(TypeDecl::new("Card")
            .field(FieldDecl::string("number"))
            .field(FieldDecl::int("balance").optional())
            .field(FieldDecl::bool("frozen").optional())
            .field(FieldDecl::time("expires_at").optional().with_update_default())
            .edge(EdgeDecl::inverse("owner", "User", "cards").unique()))
}
