/// User collection with a unique email index

use std::sync::Arc;

use super::clock::Clock;
use super::collection::{Collection, CollectionError, UniqueField};
use super::id::IdGenerator;
use super::StoreError;
use crate::models::user::{CreateUser, UpdateUser, User};

fn email(user: &User) -> &str {
    &user.email
}

/// Owns every `User` record of a [`DataStore`](super::DataStore)
pub struct UserStore {
    collection: Collection<User>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl UserStore {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            collection: Collection::new(
                "users",
                vec![UniqueField {
                    name: "email",
                    key: email,
                }],
                Arc::clone(&clock),
            ),
            ids,
            clock,
        }
    }

    /// Creates a user with a fresh id and `created_at == updated_at`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateEmail` if another user already has this
    /// email. Concurrent registrations with the same email cannot both succeed.
    pub fn create(&self, data: CreateUser) -> Result<User, StoreError> {
        let now = self.clock.now();
        let user = User {
            id: self.ids.next_id(),
            name: data.name,
            email: data.email,
            password_hash: data.password_hash,
            created_at: now,
            updated_at: now,
        };

        self.collection.insert(user).map_err(map_duplicate)
    }

    pub fn find_by_id(&self, id: &str) -> Option<User> {
        self.collection.find_by_id(id)
    }

    /// Exact, case-sensitive email lookup
    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.collection.find_one_by(|user| user.email == email)
    }

    /// Applies a profile update
    ///
    /// Returns `Ok(None)` if the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateEmail` if the new email is taken.
    pub fn update(&self, id: &str, data: UpdateUser) -> Result<Option<User>, StoreError> {
        self.collection.update(id, data).map_err(map_duplicate)
    }

    /// Removes a user; their goals are left in place
    pub fn delete(&self, id: &str) -> bool {
        self.collection.delete(id)
    }

    pub fn count(&self) -> usize {
        self.collection.len()
    }

    pub(crate) fn clear(&self) {
        self.collection.clear();
    }
}

fn map_duplicate(err: CollectionError) -> StoreError {
    match err {
        CollectionError::DuplicateKey {
            field: "email",
            value,
            ..
        } => StoreError::DuplicateEmail(value),
        other => StoreError::Collection(other),
    }
}
