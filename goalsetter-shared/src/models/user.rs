/// User model
///
/// Users are created at registration and looked up by id (session
/// resolution) or by email (login). Email is the collection's unique key.
///
/// Two views of a user exist:
///
/// - [`User`]: the stored record, including the Argon2id password hash.
///   The hash is never serialized.
/// - [`PublicUser`]: the identity handed to request handlers after session
///   resolution. It has no credential field at all.
///
/// # Example
///
/// ```
/// use goalsetter_shared::models::user::{CreateUser, PublicUser};
/// use goalsetter_shared::store::DataStore;
///
/// let store = DataStore::new();
/// let user = store
///     .create_user(CreateUser {
///         name: "Ada".to_string(),
///         email: "ada@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     })
///     .unwrap();
///
/// let public = PublicUser::from(user);
/// assert_eq!(public.email, "ada@example.com");
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::collection::Document;

/// Stored user record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque unique id, assigned at creation
    #[serde(rename = "_id")]
    pub id: String,

    /// Display name
    pub name: String,

    /// Email address, unique across users (compared case-sensitively)
    pub email: String,

    /// Argon2id PHC hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Resolved caller identity without credential material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    pub email: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,

    pub email: String,

    /// Already-hashed password (never plaintext)
    pub password_hash: String,
}

/// Partial update of a user's profile
///
/// Only `Some` fields are applied. `id` and `created_at` cannot be changed.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,

    /// New email; still subject to the uniqueness check
    pub email: Option<String>,

    pub password_hash: Option<String>,
}

impl Document for User {
    type Patch = UpdateUser;

    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn apply(&mut self, patch: UpdateUser, updated_at: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(password_hash) = patch.password_hash {
            self.password_hash = password_hash;
        }
        self.updated_at = updated_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        let now = Utc::now();
        User {
            id: "u1".to_string(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_user_serialization_hides_password() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json["_id"], "u1");
        assert_eq!(json["email"], "test@example.com");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("argon2id"));
    }

    #[test]
    fn test_public_user_from_user() {
        let user = sample();
        let public = PublicUser::from(user.clone());

        assert_eq!(public.id, user.id);
        assert_eq!(public.name, user.name);
        assert_eq!(public.created_at, user.created_at);
    }

    #[test]
    fn test_apply_partial_update() {
        let mut user = sample();
        let later = user.updated_at + chrono::Duration::seconds(1);

        user.apply(
            UpdateUser {
                name: Some("Renamed".to_string()),
                ..Default::default()
            },
            later,
        );

        assert_eq!(user.name, "Renamed");
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.password_hash, "$argon2id$secret");
        assert_eq!(user.updated_at, later);
        assert!(user.created_at < user.updated_at);
    }
}
