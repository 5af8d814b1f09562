//! Request-time authorization matching

use super::error::{AuthError, AuthorizationError};
use super::models::{Claims, UserType};

/// Decide whether `claims` may act on the resource owned by `requested_resource_id`
///
/// A `USER` may only reach its own resources. `ADMIN` is granted unconditionally.
/// Claims without a user type (refresh credentials) are never granted.
pub fn authorize(claims: &Claims, requested_resource_id: &str) -> Result<(), AuthorizationError> {
    match claims.user_type {
        Some(UserType::User) if claims.user_id == requested_resource_id => Ok(()),
        Some(UserType::User) => Err(AuthError::Forbidden),
        Some(kind) if kind.is_elevated() => Ok(()),
        _ => Err(AuthError::Forbidden),
    }
}

/// Grant only elevated user types
pub fn require_admin(claims: &Claims) -> Result<(), AuthorizationError> {
    match claims.user_type {
        Some(kind) if kind.is_elevated() => Ok(()),
        _ => Err(AuthError::Forbidden),
    }
}
