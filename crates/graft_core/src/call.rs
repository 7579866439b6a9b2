//! The canonical call-tree representation and its JSON wire decoding.
//!
//! On the wire a call is a JSON array: `[name]`, `[name, args]`,
//! `[name, ...children]`, or `[name, args, ...children]`. A plain JSON
//! object in position 1 is the args slot (for `::when`, the conditions
//! object). Children are strings (sugar for a childless call) or nested
//! arrays. Decoding is a separate pass from execution so other transports
//! can produce the same tree.

use crate::error::StructuralError;
use serde_json::{Map, Value};

/// Reserved name for the fan-out meta-operator.
pub const COMPOSE: &str = "::compose";

/// Reserved name for the conditional-inclusion meta-operator.
pub const WHEN: &str = "::when";

/// One request unit: a named field invocation with optional arguments and
/// child requests.
#[derive(Debug, Clone, PartialEq)]
pub struct CallNode {
    /// The field (or meta-operator) name.
    pub name: String,
    /// The args object, if position 1 was a plain object.
    pub args: Option<Map<String, Value>>,
    /// Child calls, in request order.
    pub children: Vec<CallNode>,
}

impl CallNode {
    /// A childless, argless call. Equivalent to a bare string child.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: None,
            children: Vec::new(),
        }
    }

    /// True if this node is the `::compose` meta-operator.
    pub fn is_compose(&self) -> bool {
        self.name == COMPOSE
    }

    /// True if this node is a `::when` condition block.
    pub fn is_when(&self) -> bool {
        self.name == WHEN
    }

    /// Decodes the JSON array encoding into a call tree.
    ///
    /// Shape violations are structural errors: the transport should turn
    /// them into a total-failure envelope.
    pub fn from_value(value: &Value) -> Result<Self, StructuralError> {
        let items = value
            .as_array()
            .ok_or_else(|| StructuralError::NotAnArray(render(value)))?;

        let name = match items.first() {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            Some(other) => return Err(StructuralError::InvalidCallName(render(other))),
            None => return Err(StructuralError::InvalidCallName(String::new())),
        };

        let mut rest = &items[1..];
        let args = match rest.first() {
            Some(Value::Object(map)) => {
                rest = &rest[1..];
                Some(map.clone())
            }
            _ => None,
        };

        let children = rest
            .iter()
            .map(|child| match child {
                Value::String(name) if !name.is_empty() => Ok(Self::leaf(name.clone())),
                Value::Array(_) => Self::from_value(child),
                _ => Err(StructuralError::InvalidChild),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name,
            args,
            children,
        })
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_bare_call() {
        let node = CallNode::from_value(&json!(["viewer"])).unwrap();
        assert_eq!(node, CallNode::leaf("viewer"));
    }

    #[test]
    fn test_decode_args_and_children() {
        let node =
            CallNode::from_value(&json!(["user", {"id": "5"}, "name", ["posts", "title"]]))
                .unwrap();
        assert_eq!(node.name, "user");
        assert_eq!(node.args.as_ref().unwrap()["id"], json!("5"));
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[0], CallNode::leaf("name"));
        assert_eq!(node.children[1].name, "posts");
        assert_eq!(node.children[1].children, vec![CallNode::leaf("title")]);
    }

    #[test]
    fn test_object_only_in_position_one_is_args() {
        // Past position 1 an object is not a valid child.
        let err = CallNode::from_value(&json!(["user", "name", {"id": "5"}])).unwrap_err();
        assert_eq!(err, StructuralError::InvalidChild);
    }

    #[test]
    fn test_when_conditions_land_in_args_slot() {
        let node =
            CallNode::from_value(&json!(["::when", {"eql": ["isAdmin", true]}, "adminId"]))
                .unwrap();
        assert!(node.is_when());
        assert!(node.args.is_some());
        assert_eq!(node.children, vec![CallNode::leaf("adminId")]);
    }

    #[test]
    fn test_decode_rejects_non_array() {
        let err = CallNode::from_value(&json!("viewer")).unwrap_err();
        assert_eq!(err, StructuralError::NotAnArray("viewer".to_string()));
    }

    #[test]
    fn test_decode_rejects_bad_name() {
        let err = CallNode::from_value(&json!([42, "name"])).unwrap_err();
        assert_eq!(err, StructuralError::InvalidCallName("42".to_string()));

        let err = CallNode::from_value(&json!([])).unwrap_err();
        assert!(matches!(err, StructuralError::InvalidCallName(_)));
    }

    #[test]
    fn test_decode_rejects_bad_child() {
        let err = CallNode::from_value(&json!(["user", 42])).unwrap_err();
        assert_eq!(err, StructuralError::InvalidChild);
    }
}
