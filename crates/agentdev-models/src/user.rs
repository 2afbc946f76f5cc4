//! Users and roles.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::ids::UserId;

/// Access role, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Viewer,
    #[default]
    User,
    Developer,
    Admin,
}

impl Role {
    /// Position in the role hierarchy.
    pub fn level(self) -> u8 {
        match self {
            Role::Viewer => 1,
            Role::User => 2,
            Role::Developer => 3,
            Role::Admin => 4,
        }
    }

    /// Returns true if this role grants at least `required`.
    pub fn satisfies(self, required: Role) -> bool {
        self.level() >= required.level()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::User => "user",
            Role::Developer => "developer",
            Role::Admin => "admin",
        }
    }

    /// Parses a role name; unknown names grant the lowest level.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "developer" => Role::Developer,
            "user" => Role::User,
            _ => Role::Viewer,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::parse_lenient(&raw))
    }
}

/// Public view of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn new(
        user_id: impl Into<UserId>,
        email: impl Into<String>,
        name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            name: name.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_hierarchy() {
        assert!(Role::Admin.satisfies(Role::Developer));
        assert!(Role::Developer.satisfies(Role::Developer));
        assert!(!Role::User.satisfies(Role::Developer));
        assert!(!Role::Viewer.satisfies(Role::User));
    }

    #[test]
    fn test_unknown_role_deserializes_to_viewer() {
        let role: Role = serde_json::from_str("\"superuser\"").unwrap();
        assert_eq!(role, Role::Viewer);

        let role: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_user_wire_format() {
        let user = User::new("user_123", "admin@example.com", "Admin User", Role::Admin);
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["user_id"], "user_123");
        assert_eq!(json["email"], "admin@example.com");
        assert_eq!(json["role"], "admin");
    }
}
