//! Raw type tokens and their normalized descriptors.

use serde::{Deserialize, Serialize};

/// Returns true if `name` is one of the allowed native type names.
///
/// The native set is fixed and case-sensitive: anything else must be
/// declared as a custom type in the spec registry.
pub fn is_native_type(name: &str) -> bool {
    matches!(name, "Object" | "String" | "Number" | "Boolean")
}

/// A raw type token as written in a field declaration.
///
/// Either a bare type name, optionally suffixed with `!` to mark it
/// required (`"Person!"`), or a single-element list wrapping such a name
/// (`["Person!"]`) to declare an array of that type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeToken {
    /// A bare type name.
    Name(String),
    /// An array of the wrapped type name.
    List([String; 1]),
}

impl TypeToken {
    /// Creates a bare name token.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Creates an array-of-name token.
    pub fn list(name: impl Into<String>) -> Self {
        Self::List([name.into()])
    }

    /// The raw type name, `!` suffix included.
    pub fn raw_name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::List([name]) => name,
        }
    }

    /// True if this token declares an array.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }
}

impl From<&str> for TypeToken {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for TypeToken {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// The normalized shape of a declared return type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// The type name with any `!` suffix stripped.
    pub name: String,
    /// True if the token was wrapped in a list.
    pub is_array: bool,
    /// True if the name carried a trailing `!`.
    pub is_required: bool,
    /// True if the name is in the native set.
    pub is_native: bool,
}

impl TypeDescriptor {
    /// Normalizes a raw type token. Pure: no error conditions.
    pub fn from_token(token: &TypeToken) -> Self {
        let raw = token.raw_name();
        let (name, is_required) = match raw.strip_suffix('!') {
            Some(stripped) => (stripped, true),
            None => (raw, false),
        };

        Self {
            name: name.to_string(),
            is_array: token.is_list(),
            is_required,
            is_native: is_native_type(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_native_name() {
        let desc = TypeDescriptor::from_token(&TypeToken::name("String"));
        assert_eq!(desc.name, "String");
        assert!(!desc.is_array);
        assert!(!desc.is_required);
        assert!(desc.is_native);
    }

    #[test]
    fn test_required_suffix_is_stripped() {
        let desc = TypeDescriptor::from_token(&TypeToken::name("Person!"));
        assert_eq!(desc.name, "Person");
        assert!(desc.is_required);
        assert!(!desc.is_native);
    }

    #[test]
    fn test_list_token() {
        let desc = TypeDescriptor::from_token(&TypeToken::list("Number!"));
        assert_eq!(desc.name, "Number");
        assert!(desc.is_array);
        assert!(desc.is_required);
        assert!(desc.is_native);
    }

    #[test]
    fn test_native_set_is_case_sensitive() {
        assert!(is_native_type("Boolean"));
        assert!(!is_native_type("boolean"));
        assert!(!is_native_type("Int"));
    }

    #[test]
    fn test_token_serde_shapes() {
        let name: TypeToken = serde_json::from_str("\"Person!\"").unwrap();
        assert_eq!(name, TypeToken::name("Person!"));

        let list: TypeToken = serde_json::from_str("[\"Person!\"]").unwrap();
        assert_eq!(list, TypeToken::list("Person!"));
    }
}
