//! Roles, permissions and the authenticated principal.
//!
//! | Role | Permissions |
//! |------|-------------|
//! | Admin | all |
//! | Manager | all but `users:manage` |
//! | Technician | every read, plus `inventory:write`, `donors:write`, `storage:write` |
//! | Viewer | every read |

use serde::{Deserialize, Serialize};
use shared_types::{Actor, FieldErrors, Timestamp, UserId};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A single capability checked by a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "inventory:read")]
    InventoryRead,
    #[serde(rename = "inventory:write")]
    InventoryWrite,
    #[serde(rename = "donors:read")]
    DonorsRead,
    #[serde(rename = "donors:write")]
    DonorsWrite,
    #[serde(rename = "storage:read")]
    StorageRead,
    #[serde(rename = "storage:write")]
    StorageWrite,
    #[serde(rename = "reports:read")]
    ReportsRead,
    #[serde(rename = "users:manage")]
    UsersManage,
}

impl Permission {
    pub const ALL: [Permission; 8] = [
        Permission::InventoryRead,
        Permission::InventoryWrite,
        Permission::DonorsRead,
        Permission::DonorsWrite,
        Permission::StorageRead,
        Permission::StorageWrite,
        Permission::ReportsRead,
        Permission::UsersManage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::InventoryRead => "inventory:read",
            Permission::InventoryWrite => "inventory:write",
            Permission::DonorsRead => "donors:read",
            Permission::DonorsWrite => "donors:write",
            Permission::StorageRead => "storage:read",
            Permission::StorageWrite => "storage:write",
            Permission::ReportsRead => "reports:read",
            Permission::UsersManage => "users:manage",
        }
    }

    pub fn is_read(&self) -> bool {
        matches!(
            self,
            Permission::InventoryRead
                | Permission::DonorsRead
                | Permission::StorageRead
                | Permission::ReportsRead
        )
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Manager,
    Technician,
    Viewer,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Manager, Role::Technician, Role::Viewer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::Technician => "Technician",
            Role::Viewer => "Viewer",
        }
    }

    pub fn allows(&self, permission: Permission) -> bool {
        match self {
            Role::Admin => true,
            Role::Manager => permission != Permission::UsersManage,
            Role::Technician => {
                permission.is_read()
                    || matches!(
                        permission,
                        Permission::InventoryWrite | Permission::DonorsWrite | Permission::StorageWrite
                    )
            }
            Role::Viewer => permission.is_read(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}' (expected Admin, Manager, Technician or Viewer)")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseRoleError(s.to_string()))
    }
}

/// The caller a request was authenticated as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub name: String,
    pub role: Role,
}

impl Principal {
    pub fn can(&self, permission: Permission) -> bool {
        self.role.allows(permission)
    }

    /// Actor recorded on audit entries written for this caller.
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id.clone(), self.name.clone())
    }
}

/// A user account. The token is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    pub active: bool,
    pub created_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deactivated_at: Option<Timestamp>,
}

impl User {
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.id.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

/// A freshly created user together with its one-time token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedUser {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
}

const MAX_USER_NAME_LEN: usize = 100;

/// A user account as submitted by an administrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewUserRequest {
    pub name: String,
    pub role: String,
}

impl NewUserRequest {
    pub fn validate(self) -> Result<(String, Role), UserError> {
        let mut errors = FieldErrors::new();
        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.add("name", "is required");
        } else if name.chars().count() > MAX_USER_NAME_LEN {
            errors.add("name", format!("must be at most {} characters", MAX_USER_NAME_LEN));
        }
        let role = match self.role.parse::<Role>() {
            Ok(role) => Some(role),
            Err(e) => {
                errors.add("role", e.to_string());
                None
            }
        };
        match role {
            Some(role) if errors.is_empty() => Ok((name, role)),
            _ => Err(UserError::Validation(errors)),
        }
    }
}

/// Errors of the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// A seeded token collides with an existing user's token.
    #[error("token already issued")]
    DuplicateToken,
}

/// Generate an opaque bearer token.
pub fn generate_token() -> String {
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_matrix() {
        for p in Permission::ALL {
            assert!(Role::Admin.allows(p));
            assert_eq!(Role::Manager.allows(p), p != Permission::UsersManage);
            assert_eq!(Role::Viewer.allows(p), p.is_read());
        }
        assert!(Role::Technician.allows(Permission::InventoryWrite));
        assert!(Role::Technician.allows(Permission::ReportsRead));
        assert!(!Role::Technician.allows(Permission::UsersManage));
    }

    #[test]
    fn test_permission_serde_names() {
        let json = serde_json::to_string(&Permission::InventoryWrite).unwrap();
        assert_eq!(json, "\"inventory:write\"");
        assert_eq!(Permission::UsersManage.to_string(), "users:manage");
    }

    #[test]
    fn test_parse_role() {
        assert_eq!("technician".parse::<Role>().unwrap(), Role::Technician);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_principal_actor() {
        let p = Principal {
            user_id: UserId::from("USR-1"),
            name: "Ama".into(),
            role: Role::Viewer,
        };
        let actor = p.actor();
        assert_eq!(actor.user_id.as_str(), "USR-1");
        assert_eq!(actor.name, "Ama");
    }

    #[test]
    fn test_new_user_validation() {
        let (name, role) = NewUserRequest {
            name: "  Kofi ".into(),
            role: "Manager".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(name, "Kofi");
        assert_eq!(role, Role::Manager);

        match NewUserRequest::default().validate() {
            Err(UserError::Validation(fields)) => {
                assert!(fields.contains("name"));
                assert!(fields.contains("role"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }
}
