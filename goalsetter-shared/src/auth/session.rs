/// Session resolution: bearer token → user
///
/// Token cryptography is delegated to a [`TokenVerifier`]; this module only
/// decides what a verified (or unverifiable) token means for the caller.
///
/// # Failure Modes
///
/// - [`SessionError::MissingToken`]: no `Authorization: Bearer <token>` header
/// - [`SessionError::InvalidToken`]: the verifier rejected the token
///   (malformed, bad signature, expired, foreign issuer)
/// - [`SessionError::StaleSession`]: the token is valid but its user no
///   longer exists, e.g. it was removed after the token was issued
///
/// # Example
///
/// ```
/// use goalsetter_shared::auth::jwt::{create_token, Claims, JwtVerifier};
/// use goalsetter_shared::auth::session::SessionResolver;
/// use goalsetter_shared::models::user::CreateUser;
/// use goalsetter_shared::store::DataStore;
/// use std::sync::Arc;
///
/// let secret = "test-secret-key-at-least-32-bytes-long";
/// let store = DataStore::new();
/// let user = store.create_user(CreateUser {
///     name: "Ada".to_string(),
///     email: "ada@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).unwrap();
///
/// let token = create_token(&Claims::new(user.id.clone()), secret).unwrap();
/// let sessions = SessionResolver::new(Arc::new(JwtVerifier::new(secret)));
///
/// let resolved = sessions.resolve(store.users(), &token).unwrap();
/// assert_eq!(resolved.id, user.id);
/// ```

use std::sync::Arc;

use super::jwt::JwtError;
use crate::models::user::PublicUser;
use crate::store::users::UserStore;

/// Verifies a session token and returns the user id it was issued for
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<String, JwtError>;
}

/// Error type for session resolution
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No bearer token was presented
    #[error("Not authorized, no token")]
    MissingToken,

    /// Token failed verification
    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    /// Token verified, but its user does not exist
    #[error("Session user {0} no longer exists")]
    StaleSession(String),
}

/// Extracts the token from an `Authorization` header value
///
/// # Errors
///
/// Returns `SessionError::MissingToken` if the header is absent, does not use
/// the `Bearer` scheme, or carries an empty token.
pub fn bearer_token(header: Option<&str>) -> Result<&str, SessionError> {
    header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(SessionError::MissingToken)
}

/// Resolves bearer tokens against a user store
#[derive(Clone)]
pub struct SessionResolver {
    verifier: Arc<dyn TokenVerifier>,
}

impl SessionResolver {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier }
    }

    /// Resolves `token` to the user it was issued for
    ///
    /// The returned identity carries no credential material.
    ///
    /// # Errors
    ///
    /// `SessionError::InvalidToken` or `SessionError::StaleSession`, see the
    /// module docs.
    pub fn resolve(&self, users: &UserStore, token: &str) -> Result<PublicUser, SessionError> {
        let user_id = self.verifier.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            SessionError::InvalidToken(e.to_string())
        })?;

        match users.find_by_id(&user_id) {
            Some(user) => Ok(PublicUser::from(user)),
            None => {
                tracing::debug!(user_id = %user_id, "Session token refers to a missing user");
                Err(SessionError::StaleSession(user_id))
            }
        }
    }

    /// Resolves the raw `Authorization` header value of a request
    ///
    /// # Errors
    ///
    /// `SessionError::MissingToken` when there is no bearer token, otherwise as
    /// [`SessionResolver::resolve`].
    pub fn resolve_header(
        &self,
        users: &UserStore,
        header: Option<&str>,
    ) -> Result<PublicUser, SessionError> {
        let token = bearer_token(header)?;
        self.resolve(users, token)
    }
}
