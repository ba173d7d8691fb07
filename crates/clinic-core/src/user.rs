//! User accounts.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored user account.
///
/// Only the Argon2 hash of the password is kept, and it is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Validated input for creating a user. The password is plaintext until the
/// store hashes it.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

impl NewUser {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_never_serializes_hash() {
        let user = User {
            id: Uuid::nil(),
            username: "reception".into(),
            password_hash: "$argon2id$v=19$...".into(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["username"], "reception");
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn test_new_user_debug_redacts_password() {
        let debug = format!("{:?}", NewUser::new("reception", "hunter2"));
        assert!(debug.contains("reception"));
        assert!(!debug.contains("hunter2"));
    }
}
