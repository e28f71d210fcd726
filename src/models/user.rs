use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A user's role. Flat model: there is exactly one privileged tier and no
/// hierarchy, so `admin` does not implicitly satisfy a `user` requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// The storage representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Parses a stored role string.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(AppError::Internal(format!("Unknown role in store: {}", other))),
        }
    }
}

/// Checks the authenticated identity's role against the required role.
///
/// Pure equality; what to do with a failure (the boundary redirects to the
/// landing page) is not this function's decision.
pub fn require_role(snapshot: &UserSnapshot, required: Role) -> Result<()> {
    if snapshot.role == required {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// The denormalized identity carried by an access token. Request-scoped;
/// never shared across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub id: i32,
    pub email: String,
    pub role: Role,
}

/// Represents a user in the system. The persisted record is the source of
/// truth for identity; tokens only carry a snapshot of it.
#[derive(Clone, Debug)]
pub struct User {
    /// The unique identifier for the user.
    pub id: i32,
    /// The user's email address.
    pub email: String,
    /// The user's hashed password.
    pub hashed_password: String,
    /// The user's first name.
    pub first_name: String,
    /// The user's last name.
    pub last_name: String,
    /// The user's role.
    pub role: Role,
    /// Whether the user is active.
    pub is_active: bool,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The snapshot encoded into this user's access tokens.
    pub fn snapshot(&self) -> UserSnapshot {
        UserSnapshot {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(role: Role) -> UserSnapshot {
        UserSnapshot {
            id: 1,
            email: "someone@crafters.edu".to_string(),
            role,
        }
    }

    #[test]
    fn admin_satisfies_admin() {
        assert!(require_role(&snapshot(Role::Admin), Role::Admin).is_ok());
    }

    #[test]
    fn user_does_not_satisfy_admin() {
        let err = require_role(&snapshot(Role::User), Role::Admin).unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[test]
    fn no_hierarchy_admin_does_not_satisfy_user() {
        assert!(require_role(&snapshot(Role::Admin), Role::User).is_err());
        assert!(require_role(&snapshot(Role::User), Role::User).is_ok());
    }

    #[test]
    fn role_storage_round_trip() {
        assert_eq!(Role::parse("admin").unwrap(), Role::Admin);
        assert_eq!(Role::parse("user").unwrap(), Role::User);
        assert_eq!(Role::Admin.as_str(), "admin");
        assert!(Role::parse("superuser").is_err());
    }
}
