/// Record types held by the data store
///
/// # Models
///
/// - `user`: User accounts, plus the credential-free `PublicUser` identity
/// - `goal`: Goals owned by users
///
/// Each model implements [`Document`](crate::store::collection::Document)
/// and comes with `Create*` / `Update*` input structs.

pub mod goal;
pub mod user;
