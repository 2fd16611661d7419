/// In-memory data store
///
/// The store keeps every record in process memory. Nothing is written to
/// disk, and the API server clears the store on boot, so each run starts
/// from an empty state.
///
/// # Modules
///
/// - [`id`]: Unique id generation
/// - [`clock`]: Timestamp source
/// - [`collection`]: Generic insertion-ordered table with unique fields
/// - [`users`]: User collection, unique by email
/// - [`goals`]: Goal collection, owned by users
///
/// # Ownership
///
/// [`DataStore`] owns both collections. It is constructed explicitly by the
/// process entry point (or by a test) and shared behind an `Arc`; there is
/// no global instance. Goals reference their owner by id only.
///
/// # Example
///
/// ```
/// use goalsetter_shared::models::goal::{CreateGoal, UpdateGoal};
/// use goalsetter_shared::models::user::{CreateUser, PublicUser};
/// use goalsetter_shared::store::DataStore;
///
/// let store = DataStore::new();
/// let owner = store.create_user(CreateUser {
///     name: "Ada".to_string(),
///     email: "ada@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).unwrap();
///
/// let goal = store.create_goal(CreateGoal {
///     text: "Run 5k".to_string(),
///     user: owner.id.clone(),
/// }).unwrap();
///
/// let requester = PublicUser::from(owner);
/// let updated = store
///     .update_goal(&goal.id, Some(&requester), UpdateGoal { text: Some("Run 10k".to_string()) })
///     .unwrap();
/// assert_eq!(updated.text, "Run 10k");
/// ```

pub mod clock;
pub mod collection;
pub mod goals;
pub mod id;
pub mod users;

use std::sync::Arc;

use crate::auth::authorization::{authorize, AuthzError};
use crate::models::goal::{CreateGoal, Goal, UpdateGoal};
use crate::models::user::{CreateUser, PublicUser, User};
use clock::{Clock, SystemClock};
use collection::CollectionError;
use goals::GoalStore;
use id::{IdGenerator, TimeRandomIdGenerator};
use users::UserStore;

/// Error type for store operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A user with this email already exists
    #[error("User with email {0} already exists")]
    DuplicateEmail(String),

    /// Malformed input, e.g. an empty required field
    #[error("{0}")]
    Validation(String),

    /// Referenced user does not exist
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Any other key collision
    #[error(transparent)]
    Collection(#[from] CollectionError),
}

/// The user and goal collections of one process
pub struct DataStore {
    users: UserStore,
    goals: GoalStore,
}

impl DataStore {
    /// Creates an empty store with the default id generator and system clock
    pub fn new() -> Self {
        Self::with_components(Arc::new(TimeRandomIdGenerator::new()), Arc::new(SystemClock))
    }

    /// Creates an empty store with the given id source and clock
    pub fn with_components(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users: UserStore::new(Arc::clone(&ids), Arc::clone(&clock)),
            goals: GoalStore::new(ids, clock),
        }
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    pub fn goals(&self) -> &GoalStore {
        &self.goals
    }

    /// Removes all users and goals
    ///
    /// Called once at process start. Not meant as a runtime operation.
    pub fn clear(&self) {
        self.goals.clear();
        self.users.clear();
    }

    /// Registers a user
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateEmail` if the email is taken.
    pub fn create_user(&self, data: CreateUser) -> Result<User, StoreError> {
        self.users.create(data)
    }

    /// Looks up the user who is trying to log in
    ///
    /// Password comparison is left to the caller.
    pub fn authenticate_by_email(&self, email: &str) -> Option<User> {
        self.users.find_by_email(email)
    }

    /// Goals of one user in creation order
    pub fn list_goals(&self, user_id: &str) -> Vec<Goal> {
        self.goals.for_user(user_id)
    }

    /// Creates a goal for an existing user
    ///
    /// # Errors
    ///
    /// `StoreError::Validation` for blank text, `StoreError::UserNotFound` for
    /// an unknown owner.
    pub fn create_goal(&self, data: CreateGoal) -> Result<Goal, StoreError> {
        self.goals.create(&self.users, data)
    }

    pub fn get_goal(&self, id: &str) -> Option<Goal> {
        self.goals.find_by_id(id)
    }

    /// Updates a goal on behalf of `requester`
    ///
    /// # Errors
    ///
    /// Checked in order: `AuthzError::NotFound` if the goal does not exist,
    /// `AuthzError::Unauthorized` if there is no requester,
    /// `AuthzError::Forbidden` if the requester does not own the goal.
    pub fn update_goal(
        &self,
        id: &str,
        requester: Option<&PublicUser>,
        patch: UpdateGoal,
    ) -> Result<Goal, AuthzError> {
        let target = self.goals.find_by_id(id);
        authorize(requester, target.as_ref()).into_result()?;

        // Deleted between the check and the write
        self.goals.update(id, patch).ok_or(AuthzError::NotFound)
    }

    /// Deletes a goal on behalf of `requester`
    ///
    /// # Errors
    ///
    /// Same checks, in the same order, as [`DataStore::update_goal`].
    pub fn delete_goal(&self, id: &str, requester: Option<&PublicUser>) -> Result<(), AuthzError> {
        let target = self.goals.find_by_id(id);
        authorize(requester, target.as_ref()).into_result()?;

        if self.goals.delete(id) {
            Ok(())
        } else {
            Err(AuthzError::NotFound)
        }
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(store: &DataStore, email: &str) -> PublicUser {
        store
            .create_user(CreateUser {
                name: "User".to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
            })
            .map(PublicUser::from)
            .unwrap()
    }

    #[test]
    fn test_authenticate_by_email() {
        let store = DataStore::new();
        let user = register(&store, "a@example.com");

        assert_eq!(store.authenticate_by_email("a@example.com").unwrap().id, user.id);
        assert!(store.authenticate_by_email("b@example.com").is_none());
    }

    #[test]
    fn test_clear_resets_both_collections() {
        let store = DataStore::new();
        let user = register(&store, "a@example.com");
        store
            .create_goal(CreateGoal {
                text: "x".to_string(),
                user: user.id.clone(),
            })
            .unwrap();

        store.clear();

        assert_eq!(store.users().count(), 0);
        assert_eq!(store.goals().count(), 0);
        assert!(store.list_goals(&user.id).is_empty());
    }

    #[test]
    fn test_delete_goal_twice() {
        let store = DataStore::new();
        let owner = register(&store, "a@example.com");
        let goal = store
            .create_goal(CreateGoal {
                text: "x".to_string(),
                user: owner.id.clone(),
            })
            .unwrap();

        assert_eq!(store.delete_goal(&goal.id, Some(&owner)), Ok(()));
        assert_eq!(store.delete_goal(&goal.id, Some(&owner)), Err(AuthzError::NotFound));
        assert!(store.get_goal(&goal.id).is_none());
    }

    #[test]
    fn test_goals_survive_owner_deletion() {
        let store = DataStore::new();
        let owner = register(&store, "a@example.com");
        let goal = store
            .create_goal(CreateGoal {
                text: "x".to_string(),
                user: owner.id.clone(),
            })
            .unwrap();

        assert!(store.users().delete(&owner.id));

        assert_eq!(store.get_goal(&goal.id), Some(goal));
        assert!(matches!(
            store.create_goal(CreateGoal {
                text: "y".to_string(),
                user: owner.id,
            }),
            Err(StoreError::UserNotFound(_))
        ));
    }
}
