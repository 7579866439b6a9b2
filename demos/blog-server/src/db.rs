//! Mock database for demonstration.
//!
//! In production, this would be replaced with actual database connections.

use serde_json::{json, Value};

/// Seeded users, shaped the way the Person resolvers expect them.
pub fn users() -> Vec<Value> {
    vec![
        json!({
            "id": "1",
            "name": "Alice",
            "age": 34,
            "isAdmin": true,
            "adminId": "admin-001"
        }),
        json!({
            "id": "2",
            "name": "Bob",
            "age": 19,
            "isAdmin": false,
            "adminId": null
        }),
        json!({
            "id": "3",
            "name": "Carol",
            "age": 27,
            "isAdmin": false,
            "adminId": null
        }),
    ]
}

pub fn user_by_id(id: &str) -> Option<Value> {
    users().into_iter().find(|u| u["id"] == json!(id))
}

/// Posts keyed by author id.
pub fn posts_by_author(author_id: &str) -> Vec<Value> {
    match author_id {
        "1" => vec![
            json!({"title": "Grafting 101", "body": "Start small.", "likes": 12}),
            json!({"title": "Tree shapes", "body": "Depth matters.", "likes": 4}),
        ],
        "2" => vec![json!({"title": "Hello world", "body": "First post.", "likes": 0})],
        _ => vec![],
    }
}
