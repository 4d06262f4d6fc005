//! Outbound ports for the API Gateway.

use crate::domain::{IssuedUser, Principal, Role, User, UserError};
use shared_types::UserId;

/// Store of user accounts and their bearer tokens.
///
/// Tokens are opaque. A deactivated user's token stops resolving
/// immediately.
pub trait UserDirectory: Send + Sync {
    /// Create a user and issue a fresh token.
    fn create(&self, name: &str, role: Role) -> Result<IssuedUser, UserError>;

    /// Create a user with a token chosen by the operator (bootstrap admin).
    fn seed(&self, name: &str, role: Role, token: &str) -> Result<User, UserError>;

    /// Principal behind an active user's token.
    fn resolve(&self, token: &str) -> Option<Principal>;

    fn get(&self, id: &UserId) -> Result<User, UserError>;

    /// Every user, oldest first.
    fn list(&self) -> Vec<User>;

    fn deactivate(&self, id: &UserId) -> Result<User, UserError>;
}
