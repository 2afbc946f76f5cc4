//! Typed identifiers for platform records.
//!
//! Every ID is a prefixed string (`proj-<uuid>`, `agent-<uuid>`, ...). Parsing
//! accepts any string so that seeded records such as `agent_pm_001` or
//! `user_123` keep their historical spelling.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Prefix used for freshly generated IDs.
            pub const PREFIX: &'static str = $prefix;

            /// Generates a new random ID.
            pub fn new() -> Self {
                Self(format!("{}-{}", $prefix, Uuid::new_v4()))
            }

            /// Wraps an existing string.
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

define_id!(UserId, "user");
define_id!(ProjectId, "proj");
define_id!(AgentId, "agent");
define_id!(ChannelId, "chan");
define_id!(MessageId, "msg");
define_id!(ArtifactId, "artifact");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_carry_prefix() {
        assert!(ProjectId::new().as_str().starts_with("proj-"));
        assert!(AgentId::new().as_str().starts_with("agent-"));
        assert!(ChannelId::new().as_str().starts_with("chan-"));
        assert!(MessageId::new().as_str().starts_with("msg-"));
        assert!(ArtifactId::new().as_str().starts_with("artifact-"));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(ProjectId::new(), ProjectId::new());
    }

    #[test]
    fn test_legacy_ids_are_kept_verbatim() {
        let id = AgentId::from_string("agent_pm_001");
        assert_eq!(id.as_str(), "agent_pm_001");
        assert_eq!(id, "agent_pm_001");
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = UserId::from_string("user_123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"user_123\"");

        let parsed: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
