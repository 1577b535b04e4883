use thiserror::Error;

use crate::model::SessionUser;

/// Why a request was turned away by an authorization predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("login required")]
    NotLoggedIn,
    #[error("administrator privileges required")]
    AdminRequired,
}

impl AccessError {
    /// HTTP status the surrounding service answers with.
    pub fn status_code(&self) -> u16 {
        match self {
            AccessError::NotLoggedIn => 401,
            AccessError::AdminRequired => 403,
        }
    }
}

pub fn require_login(user: Option<&SessionUser>) -> Result<&SessionUser, AccessError> {
    user.ok_or(AccessError::NotLoggedIn)
}

/// Admin-only operations answer 403 whether the caller is anonymous or
/// merely lacks the role.
pub fn require_admin(user: Option<&SessionUser>) -> Result<&SessionUser, AccessError> {
    match user {
        Some(user) if user.is_admin() => Ok(user),
        _ => Err(AccessError::AdminRequired),
    }
}
