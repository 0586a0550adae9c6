//! Identifier wrappers.
//!
//! Children, questions, and answer options are identified by opaque keys
//! assigned by the assessment backend. The client never generates them, so
//! they wrap the backend's string form rather than a [`Uuid`]. Some backend
//! deployments emit integer keys; those are accepted and stored as their
//! decimal string.
//!
//! [`SessionId`] is the one identifier generated locally: it tags a single
//! orchestrator run in log output.

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around a backend-assigned string key.
macro_rules! define_key {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Wrap a backend key.
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Borrow the key as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawKey::deserialize(deserializer).map(|raw| Self(raw.into_string()))
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self(key.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(key: String) -> Self {
                Self(key)
            }
        }
    };
}

/// Wire form of a backend key: either a JSON string or a JSON number.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawKey {
    Text(String),
    Number(serde_json::Number),
}

impl RawKey {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

define_key! {
    /// Identifier of the child being assessed, assigned on login.
    ChildId
}

define_key! {
    /// Identifier of a quiz question.
    QuestionId
}

define_key! {
    /// Identifier of one answer option within a question.
    OptionId
}

/// Locally generated identifier for one orchestrator run (UUID v7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new time-ordered session identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn key_accepts_string_and_number() {
        let text: ChildId = serde_json::from_str("\"c-42\"").unwrap();
        assert_eq!(text.as_str(), "c-42");

        let number: ChildId = serde_json::from_str("42").unwrap();
        assert_eq!(number, ChildId::new("42"));
    }

    #[test]
    fn key_serializes_as_plain_string() {
        let json = serde_json::to_string(&QuestionId::new("q1")).unwrap();
        assert_eq!(json, "\"q1\"");
    }

    #[test]
    fn key_rejects_other_shapes() {
        let result: Result<OptionId, _> = serde_json::from_str("{\"id\": 1}");
        assert!(result.is_err());
    }

    #[test]
    fn session_ids_are_distinct() {
        let a = SessionId::new();
        let b = SessionId::new();
        assert_ne!(a, b);
        assert_eq!(a.to_string(), a.into_inner().to_string());
    }
}
