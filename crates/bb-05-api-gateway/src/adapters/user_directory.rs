//! In-memory user directory.

use crate::domain::{generate_token, IssuedUser, Principal, Role, User, UserError};
use crate::ports::UserDirectory;
use parking_lot::RwLock;
use shared_types::{TimeSource, UserId};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct Accounts {
    users: HashMap<UserId, User>,
    tokens: HashMap<String, UserId>,
}

/// Users and tokens behind one lock, so a token never resolves to a
/// half-written account.
pub struct InMemoryUserDirectory {
    accounts: RwLock<Accounts>,
    time_source: Arc<dyn TimeSource>,
}

impl InMemoryUserDirectory {
    pub fn new(time_source: Arc<dyn TimeSource>) -> Self {
        Self {
            accounts: RwLock::new(Accounts::default()),
            time_source,
        }
    }

    fn insert(&self, name: &str, role: Role, token: String) -> Result<User, UserError> {
        let mut accounts = self.accounts.write();
        if accounts.tokens.contains_key(&token) {
            return Err(UserError::DuplicateToken);
        }
        let user = User {
            id: UserId::generate(),
            name: name.to_string(),
            role,
            active: true,
            created_at: self.time_source.now(),
            deactivated_at: None,
        };
        accounts.tokens.insert(token, user.id.clone());
        accounts.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn create(&self, name: &str, role: Role) -> Result<IssuedUser, UserError> {
        let token = generate_token();
        let user = self.insert(name, role, token.clone())?;
        tracing::info!(user_id = %user.id, role = %role, "[bb-05] User created");
        Ok(IssuedUser { user, token })
    }

    fn seed(&self, name: &str, role: Role, token: &str) -> Result<User, UserError> {
        let user = self.insert(name, role, token.trim().to_string())?;
        tracing::info!(user_id = %user.id, role = %role, "[bb-05] Bootstrap user seeded");
        Ok(user)
    }

    fn resolve(&self, token: &str) -> Option<Principal> {
        let accounts = self.accounts.read();
        let id = accounts.tokens.get(token)?;
        accounts
            .users
            .get(id)
            .filter(|user| user.active)
            .map(User::principal)
    }

    fn get(&self, id: &UserId) -> Result<User, UserError> {
        self.accounts
            .read()
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| UserError::UserNotFound(id.clone()))
    }

    fn list(&self) -> Vec<User> {
        let mut users: Vec<User> = self.accounts.read().users.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        users
    }

    fn deactivate(&self, id: &UserId) -> Result<User, UserError> {
        let mut accounts = self.accounts.write();
        let user = accounts
            .users
            .get_mut(id)
            .ok_or_else(|| UserError::UserNotFound(id.clone()))?;
        if user.active {
            user.active = false;
            user.deactivated_at = Some(self.time_source.now());
            tracing::info!(user_id = %id, "[bb-05] User deactivated");
        }
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared_types::FixedTimeSource;

    fn directory() -> InMemoryUserDirectory {
        let clock = FixedTimeSource::new(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap());
        InMemoryUserDirectory::new(Arc::new(clock))
    }

    #[test]
    fn test_created_token_resolves() {
        let dir = directory();
        let issued = dir.create("Esi", Role::Technician).unwrap();
        let principal = dir.resolve(&issued.token).unwrap();
        assert_eq!(principal.user_id, issued.user.id);
        assert_eq!(principal.role, Role::Technician);
        assert!(dir.resolve("not-a-token").is_none());
    }

    #[test]
    fn test_deactivated_token_stops_resolving() {
        let dir = directory();
        let issued = dir.create("Yaw", Role::Viewer).unwrap();
        let user = dir.deactivate(&issued.user.id).unwrap();
        assert!(!user.active);
        assert!(user.deactivated_at.is_some());
        assert!(dir.resolve(&issued.token).is_none());
        // Still listed for audit.
        assert_eq!(dir.list().len(), 1);
    }

    #[test]
    fn test_seeded_token_collision() {
        let dir = directory();
        dir.seed("Admin", Role::Admin, "bootstrap-token-0001").unwrap();
        assert_eq!(
            dir.seed("Other", Role::Admin, "bootstrap-token-0001"),
            Err(UserError::DuplicateToken)
        );
        assert_eq!(dir.resolve("bootstrap-token-0001").unwrap().role, Role::Admin);
    }

    #[test]
    fn test_unknown_user() {
        let dir = directory();
        let id = UserId::from("US-missing");
        assert_eq!(dir.get(&id), Err(UserError::UserNotFound(id.clone())));
        assert_eq!(dir.deactivate(&id), Err(UserError::UserNotFound(id)));
    }
}
