//! End-to-end engine tests over a blog-shaped registry.

use graft_engine::{Context, Engine, ErrorEntry, FieldSpec, ResolverError, SpecRegistry, TypeToken};
use serde_json::{json, Value};

fn users() -> Value {
    json!([
        {"id": "1", "name": "Alice", "age": 34, "isAdmin": true, "adminId": "a-1"},
        {"id": "2", "name": "Bob", "age": 19, "isAdmin": false, "adminId": null}
    ])
}

fn posts_for(user_id: &str) -> Value {
    match user_id {
        "1" => json!([
            {"title": "Hello", "likes": 3},
            {"title": "Second", "likes": 0}
        ]),
        _ => json!([]),
    }
}

fn blog_registry() -> SpecRegistry {
    SpecRegistry::builder()
        .query(
            "user",
            FieldSpec::resolve_async("Person!", |req| async move {
                let id: String = req.require("id")?;
                users()
                    .as_array()
                    .unwrap()
                    .iter()
                    .find(|u| u["id"] == json!(id))
                    .cloned()
                    .ok_or_else(|| ResolverError::custom(format!("no user with id {id}")))
            })
            .expect("id", "String!"),
        )
        .query(
            "people",
            FieldSpec::resolve_fn(TypeToken::list("Person!"), |_req| Ok(users())),
        )
        .query(
            "serverTime",
            FieldSpec::resolve_fn("Number!", |_req| Ok(json!(1_724_371_200))),
        )
        .field(
            "Person",
            "id",
            FieldSpec::resolve_fn("String", |req| Ok(req.data["id"].clone())),
        )
        .field(
            "Person",
            "name",
            FieldSpec::resolve_fn("String", |req| Ok(req.data["name"].clone())),
        )
        .field(
            "Person",
            "age",
            FieldSpec::resolve_fn("Number", |req| Ok(req.data["age"].clone())),
        )
        .field(
            "Person",
            "isAdmin",
            FieldSpec::resolve_fn("Boolean", |req| Ok(req.data["isAdmin"].clone())),
        )
        .field(
            "Person",
            "adminId",
            FieldSpec::resolve_fn("String", |req| Ok(req.data["adminId"].clone())),
        )
        .field(
            "Person",
            "posts",
            FieldSpec::resolve_async(TypeToken::list("Post!"), |req| async move {
                let id = req.data["id"].as_str().unwrap_or_default().to_string();
                Ok(posts_for(&id))
            }),
        )
        .field(
            "Post",
            "title",
            FieldSpec::resolve_fn("String!", |req| Ok(req.data["title"].clone())),
        )
        .field(
            "Post",
            "likes",
            FieldSpec::resolve_fn("Number!", |req| Ok(req.data["likes"].clone())),
        )
        .build()
}

#[tokio::test]
async fn output_keys_match_requested_children_exactly() {
    let engine = Engine::new(blog_registry());
    let response = engine
        .execute(&json!(["user", {"id": "1"}, "id", "name"]), Context::new())
        .await;

    let user = response.data.unwrap()["user"].clone();
    let keys: Vec<&String> = user.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["id", "name"]);
}

#[tokio::test]
async fn nested_custom_types_resolve_recursively() {
    let engine = Engine::new(blog_registry());
    let graph = json!(["user", {"id": "1"}, "name", ["posts", "title", "likes"]]);
    let response = engine.execute(&graph, Context::new()).await;

    assert_eq!(
        response.data,
        Some(json!({
            "user": {
                "name": "Alice",
                "posts": [
                    {"title": "Hello", "likes": 3},
                    {"title": "Second", "likes": 0}
                ]
            }
        }))
    );
    assert!(response.errors.is_none());
}

#[tokio::test]
async fn compose_returns_independent_results_positionally() {
    let engine = Engine::new(blog_registry());
    let graph = json!([
        "::compose",
        ["user", {"id": "2"}, "name"],
        "serverTime",
        ["user", {"id": "1"}, "name"]
    ]);
    let response = engine.execute(&graph, Context::new()).await;

    assert_eq!(
        response.data,
        Some(json!([
            {"user": {"name": "Bob"}},
            {"serverTime": 1_724_371_200},
            {"user": {"name": "Alice"}}
        ]))
    );
}

#[tokio::test]
async fn when_admits_children_only_on_pass() {
    let engine = Engine::new(blog_registry());
    let graph = |id: &str| {
        json!([
            "user",
            {"id": id},
            "isAdmin",
            ["::when", {"eql": ["isAdmin", true]}, "adminId"]
        ])
    };

    let admin = engine.execute(&graph("1"), Context::new()).await;
    assert_eq!(
        admin.data,
        Some(json!({"user": {"isAdmin": true, "adminId": "a-1"}}))
    );

    let guest = engine.execute(&graph("2"), Context::new()).await;
    let user = guest.data.unwrap()["user"].clone();
    assert_eq!(user, json!({"isAdmin": false}));
}

#[tokio::test]
async fn when_supports_compound_conditions() {
    let engine = Engine::new(blog_registry());
    let graph = json!([
        "user",
        {"id": "1"},
        "age",
        "name",
        ["::when", {"gte": ["age", 21], "match": ["name", "^A"]}, "id"]
    ]);

    let response = engine.execute(&graph, Context::new()).await;
    let user = response.data.unwrap()["user"].clone();
    assert_eq!(user["id"], json!("1"));
}

#[tokio::test]
async fn resolver_failure_nulls_field_and_keeps_siblings() {
    let registry = SpecRegistry::builder()
        .query(
            "viewer",
            FieldSpec::resolve_fn("Person!", |_req| Ok(json!({"id": "1"}))),
        )
        .field(
            "Person",
            "id",
            FieldSpec::resolve_fn("String", |req| Ok(req.data["id"].clone())),
        )
        .field(
            "Person",
            "flaky",
            FieldSpec::resolve_async("String", |_req| async {
                Err(ResolverError::custom("downstream timeout"))
            }),
        )
        .build();

    let engine = Engine::new(registry);
    let response = engine
        .execute(&json!(["viewer", "id", "flaky"]), Context::new())
        .await;

    assert_eq!(
        response.data,
        Some(json!({"viewer": {"id": "1", "flaky": null}}))
    );
    assert_eq!(
        response.errors,
        Some(vec![ErrorEntry(
            "flaky".to_string(),
            "downstream timeout".to_string()
        )])
    );
}

#[tokio::test]
async fn root_resolver_failure_still_returns_data_envelope() {
    let engine = Engine::new(blog_registry());
    let response = engine
        .execute(&json!(["user", {"id": "404"}, "name"]), Context::new())
        .await;

    // The failing field nulls out but the envelope keeps its data key.
    assert_eq!(response.data, Some(json!({"user": null})));
    let errors = response.errors.unwrap();
    assert_eq!(errors[0].0, "user");
    assert!(errors[0].1.contains("404"));
}

#[tokio::test]
async fn structural_failures_drop_the_data_key() {
    let engine = Engine::new(blog_registry());

    // Native field with children.
    let response = engine
        .execute(&json!(["serverTime", "child"]), Context::new())
        .await;
    assert!(response.data.is_none());

    // Custom field without children.
    let response = engine
        .execute(&json!(["user", {"id": "1"}]), Context::new())
        .await;
    assert!(response.data.is_none());

    // Argument contract violation.
    let response = engine
        .execute(&json!(["user", {"id": "1", "nope": 1}, "name"]), Context::new())
        .await;
    assert!(response.data.is_none());
    let errors = response.errors.unwrap();
    assert_eq!(errors[0].0, "processingError");
}

#[tokio::test]
async fn array_results_preserve_element_order() {
    let engine = Engine::new(blog_registry());
    let response = engine
        .execute(&json!(["people", "name"]), Context::new())
        .await;

    assert_eq!(
        response.data,
        Some(json!({"people": [{"name": "Alice"}, {"name": "Bob"}]}))
    );
}

#[tokio::test]
async fn when_applies_per_array_element() {
    let engine = Engine::new(blog_registry());
    let graph = json!([
        "people",
        "name",
        "isAdmin",
        ["::when", {"truthy": ["isAdmin"]}, "adminId"]
    ]);

    let response = engine.execute(&graph, Context::new()).await;
    let people = response.data.unwrap()["people"].clone();

    assert_eq!(
        people,
        json!([
            {"name": "Alice", "isAdmin": true, "adminId": "a-1"},
            {"name": "Bob", "isAdmin": false}
        ])
    );
}

#[tokio::test]
async fn context_data_reaches_resolvers() {
    let registry = SpecRegistry::builder()
        .query(
            "whoami",
            FieldSpec::resolve_fn("String!", |req| {
                req.context
                    .get::<String>("user_id")
                    .map(Value::String)
                    .ok_or_else(|| ResolverError::custom("unauthenticated"))
            }),
        )
        .build();

    let engine = Engine::new(registry);
    let mut ctx = Context::new();
    ctx.set("user_id", "alice");

    let response = engine.execute(&json!(["whoami"]), ctx).await;
    assert_eq!(response.data, Some(json!({"whoami": "alice"})));
}

#[tokio::test]
async fn undeclared_custom_type_aborts() {
    let registry = SpecRegistry::builder()
        .query(
            "ghost",
            FieldSpec::resolve_fn("Phantom!", |_req| Ok(json!({}))),
        )
        .build();

    let engine = Engine::new(registry);
    let response = engine.execute(&json!(["ghost", "x"]), Context::new()).await;

    assert!(response.data.is_none());
    assert!(response.errors.unwrap()[0].1.contains("not defined"));
}
