/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 session tokens and the [`jwt::JwtVerifier`]
/// - [`session`]: Bearer token → user resolution
/// - [`authorization`]: Goal ownership checks
///
/// # Example
///
/// ```
/// use goalsetter_shared::auth::password::{hash_password, verify_password};
/// use goalsetter_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let token = create_token(&Claims::new("user-id"), "secret-key")?;
/// assert_eq!(validate_token(&token, "secret-key")?.sub, "user-id");
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod password;
pub mod session;
