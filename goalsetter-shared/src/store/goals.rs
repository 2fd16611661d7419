/// Goal collection

use std::sync::Arc;

use super::clock::Clock;
use super::collection::Collection;
use super::id::IdGenerator;
use super::users::UserStore;
use super::StoreError;
use crate::models::goal::{CreateGoal, Goal, UpdateGoal};

/// Owns every `Goal` record of a [`DataStore`](super::DataStore)
pub struct GoalStore {
    collection: Collection<Goal>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl GoalStore {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            collection: Collection::new("goals", Vec::new(), Arc::clone(&clock)),
            ids,
            clock,
        }
    }

    /// Creates a goal for an existing user
    ///
    /// The owner is looked up once, here. Nothing ties the goal to the user
    /// record afterwards.
    ///
    /// # Errors
    ///
    /// - `StoreError::Validation` if `text` is empty
    /// - `StoreError::UserNotFound` if `data.user` is not a known user id
    pub fn create(&self, users: &UserStore, data: CreateGoal) -> Result<Goal, StoreError> {
        if data.text.is_empty() {
            return Err(StoreError::Validation("Please add a text field".to_string()));
        }

        if users.find_by_id(&data.user).is_none() {
            return Err(StoreError::UserNotFound(data.user));
        }

        let now = self.clock.now();
        let goal = Goal {
            id: self.ids.next_id(),
            text: data.text,
            user: data.user,
            created_at: now,
            updated_at: now,
        };

        Ok(self.collection.insert(goal)?)
    }

    pub fn find_by_id(&self, id: &str) -> Option<Goal> {
        self.collection.find_by_id(id)
    }

    /// Goals owned by `user_id`, oldest first
    pub fn for_user(&self, user_id: &str) -> Vec<Goal> {
        self.collection.find_all_by(|goal| goal.user == user_id)
    }

    /// Merges `patch` into a goal; `None` if the goal does not exist
    pub fn update(&self, id: &str, patch: UpdateGoal) -> Option<Goal> {
        // No unique fields are declared for goals, so the merge cannot collide
        self.collection.update(id, patch).unwrap_or(None)
    }

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
