pub mod admin;
pub mod auth;

pub use admin::require_admin;
pub use auth::{MaybeAuthUser, optional_auth, require_auth};
