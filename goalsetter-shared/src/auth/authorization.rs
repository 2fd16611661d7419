/// Ownership checks for goal mutations
///
/// Goals are private to their owner. Before a goal is updated or deleted,
/// [`authorize`] decides whether the caller may proceed. It is a pure, total
/// function over a closed set of outcomes: every combination of inputs maps
/// to exactly one [`Decision`].
///
/// # Check Order
///
/// 1. **Existence**: no target goal → `NotFound`
/// 2. **Identity**: no resolved requester → `Unauthorized`
/// 3. **Ownership**: requester id differs from `goal.user` → `Forbidden`
/// 4. Otherwise → `Allowed`
///
/// The order decides which status a caller sees when several checks fail at
/// once and must stay as it is. Because existence is checked first, a caller
/// without a session can tell a missing goal (`NotFound`) from an existing
/// one (`Unauthorized`).
///
/// # Example
///
/// ```
/// use goalsetter_shared::auth::authorization::{authorize, Decision};
///
/// // Nothing to act on, regardless of who is asking
/// assert_eq!(authorize(None, None), Decision::NotFound);
/// ```

use crate::models::goal::Goal;
use crate::models::user::PublicUser;

/// Outcome of an ownership check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    NotFound,
    Unauthorized,
    Forbidden,
}

/// Error type for rejected goal operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Target goal does not exist
    #[error("Goal not found")]
    NotFound,

    /// No resolved identity
    #[error("User not found")]
    Unauthorized,

    /// Identity resolved but does not own the goal
    #[error("User not authorized")]
    Forbidden,
}

impl Decision {
    /// Converts the decision into `Ok(())` or the matching error
    pub fn into_result(self) -> Result<(), AuthzError> {
        match self {
            Decision::Allowed => Ok(()),
            Decision::NotFound => Err(AuthzError::NotFound),
            Decision::Unauthorized => Err(AuthzError::Unauthorized),
            Decision::Forbidden => Err(AuthzError::Forbidden),
        }
    }
}

/// Decides whether `requester` may mutate `target`
pub fn authorize(requester: Option<&PublicUser>, target: Option<&Goal>) -> Decision {
    let Some(goal) = target else {
        return Decision::NotFound;
    };

    let Some(user) = requester else {
        return Decision::Unauthorized;
    };

    if !goal.is_owned_by(&user.id) {
        return Decision::Forbidden;
    }

    Decision::Allowed
}
