//! User account model

use crate::core::auth::Identity;
use crate::core::entity::{Entity, EntityId};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

/// Letters, digits and `@ . + - _`
pub static USERNAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w.@+-]+$").expect("username pattern is a valid regex")
});

/// User account
///
/// The password is only ever held as an argon2 PHC string. Accounts created
/// without a password cannot obtain tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: EntityId,
    pub username: String,
    pub password_hash: Option<String>,
    pub is_privileged: bool,
}

impl User {
    pub fn new(username: impl Into<String>, password_hash: Option<String>, is_privileged: bool) -> Self {
        Self {
            id: 0,
            username: username.into(),
            password_hash,
            is_privileged,
        }
    }

    /// Identity this account authenticates as
    pub fn identity(&self) -> Identity {
        Identity::User {
            id: self.id,
            username: self.username.clone(),
            is_privileged: self.is_privileged,
        }
    }
}

impl Entity for User {
    fn resource_name() -> &'static str {
        "users"
    }

    fn resource_name_singular() -> &'static str {
        "user"
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn indexed_fields() -> &'static [&'static str] {
        &["username"]
    }

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "username" => Some(self.username.clone()),
            _ => None,
        }
    }
}

/// JSON representation of a user with the ids of the products they own
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    pub id: EntityId,
    pub username: String,
    pub is_staff: bool,
    pub products: Vec<EntityId>,
}

impl UserResponse {
    pub fn new(user: User, products: Vec<EntityId>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_staff: user.is_privileged,
            products,
        }
    }
}

/// Body of `POST /users/`
#[derive(Debug, Deserialize, Validate)]
pub struct UserPayload {
    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 150, message = "Ensure this field has between 1 and 150 characters."),
        regex(
            path = *USERNAME_PATTERN,
            message = "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
        )
    )]
    pub username: Option<String>,

    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub password: Option<String>,

    #[serde(default)]
    pub is_staff: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extractors::ValidatedBody;

    #[test]
    fn test_username_pattern() {
        for ok in ["jacob", "edgar.lee", "a+b", "me@example.com", "under_score", "dash-ed"] {
            assert!(USERNAME_PATTERN.is_match(ok), "{} should match", ok);
        }
        for bad in ["with space", "semi;colon", "slash/name", ""] {
            assert!(!USERNAME_PATTERN.is_match(bad), "{} should not match", bad);
        }
    }

    #[test]
    fn test_payload_validation() {
        let ValidatedBody(payload) =
            ValidatedBody::<UserPayload>::from_bytes(br#"{"username": "jacob", "password": "pw"}"#)
                .unwrap();
        assert_eq!(payload.username.as_deref(), Some("jacob"));
        assert!(!payload.is_staff);

        assert!(ValidatedBody::<UserPayload>::from_bytes(br#"{"username": "bad name"}"#).is_err());
        assert!(ValidatedBody::<UserPayload>::from_bytes(br#"{"password": "pw"}"#).is_err());
    }

    #[test]
    fn test_identity_carries_privilege_flag() {
        let mut user = User::new("admin", None, true);
        user.set_id(1);
        assert_eq!(
            user.identity(),
            Identity::User {
                id: 1,
                username: "admin".to_string(),
                is_privileged: true
            }
        );
    }

    #[test]
    fn test_response_uses_is_staff_and_hides_password() {
        let mut user = User::new("jacob", Some("$argon2id$...".to_string()), false);
        user.set_id(2);
        let value = serde_json::to_value(UserResponse::new(user, vec![1, 3])).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "id": 2, "username": "jacob", "is_staff": false, "products": [1, 3] })
        );
    }
}
