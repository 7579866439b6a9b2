//! GraftQL example blog server.
//!
//! # Running
//! ```bash
//! cd demos/blog-server && cargo run --release
//! ```
//!
//! Then try:
//! ```bash
//! curl -s http://localhost:4000/graft \
//!   -d '["user", {"id": "1"}, "name", ["posts", "title", "likes"]]' | jq
//! ```

mod db;

use graft_engine::{FieldSpec, ResolverError, SpecRegistry, TypeToken};
use graft_http::{GraftServer, ServerConfig, ServerError};
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn data_field(ty: &str, key: &'static str) -> FieldSpec {
    FieldSpec::resolve_fn(ty, move |req| Ok(req.data[key].clone()))
}

fn registry() -> SpecRegistry {
    SpecRegistry::builder()
        .query(
            "user",
            FieldSpec::resolve_async("Person!", |req| async move {
                let id: String = req.require("id")?;
                db::user_by_id(&id)
                    .ok_or_else(|| ResolverError::custom(format!("no user with id {id}")))
            })
            .expect("id", "String!"),
        )
        .query(
            "people",
            FieldSpec::resolve_fn(TypeToken::list("Person!"), |_req| {
                Ok(Value::Array(db::users()))
            }),
        )
        .query(
            "serverName",
            FieldSpec::resolve_fn("String!", |_req| Ok(json!("graftql-blog"))),
        )
        .field("Person", "id", data_field("String!", "id"))
        .field("Person", "name", data_field("String!", "name"))
        .field("Person", "age", data_field("Number", "age"))
        .field("Person", "isAdmin", data_field("Boolean!", "isAdmin"))
        .field("Person", "adminId", data_field("String", "adminId"))
        .field(
            "Person",
            "posts",
            FieldSpec::resolve_async(TypeToken::list("Post!"), |req| async move {
                let id = req.data["id"].as_str().unwrap_or_default().to_string();
                Ok(Value::Array(db::posts_by_author(&id)))
            }),
        )
        .field("Post", "title", data_field("String!", "title"))
        .field("Post", "body", data_field("String!", "body"))
        .field("Post", "likes", data_field("Number!", "likes"))
        .build()
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("graft=info".parse().unwrap()),
        )
        .with_target(false)
        .compact()
        .init();

    let registry = registry();
    info!("Registry built");

    GraftServer::builder()
        .config(ServerConfig::new().host("0.0.0.0").port(4000).ui(true))
        .registry(registry)
        .build()?
        .listen()
        .await
}
