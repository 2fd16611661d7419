/// Goal model
///
/// A goal is a short piece of text owned by one user. The `user` field is a
/// back-reference by id: the goal store never holds the user record itself,
/// and deleting a user does not delete their goals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::collection::Document;

/// Stored goal record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Opaque unique id, assigned at creation
    #[serde(rename = "_id")]
    pub id: String,

    /// Goal text, non-empty at creation
    pub text: String,

    /// Id of the owning user
    pub user: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Whether the goal belongs to `user_id`
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user == user_id
    }
}

/// Input for creating a goal
#[derive(Debug, Clone)]
pub struct CreateGoal {
    pub text: String,

    /// Owner id; must reference an existing user
    pub user: String,
}

/// Partial update of a goal
///
/// Only `text` is mutable. `id`, `user` and `created_at` are fixed for the
/// lifetime of the record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGoal {
    pub text: Option<String>,
}

impl Document for Goal {
    type Patch = UpdateGoal;

    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn apply(&mut self, patch: UpdateGoal, updated_at: DateTime<Utc>) {
        if let Some(text) = patch.text {
            self.text = text;
        }
        self.updated_at = updated_at;
    }
}
