//! In-memory repository for user registry tests and single-process use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::registry::{
    domain::{Principal, Role, User, UserStatus},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<InMemoryUserState>>,
}

#[derive(Debug, Default)]
struct InMemoryUserState {
    users: HashMap<Principal, User>,
    superadmin_claimed: bool,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.users.contains_key(user.principal()) {
            return Err(UserRepositoryError::DuplicatePrincipal(
                user.principal().clone(),
            ));
        }
        if user.role() == Role::Superadmin {
            state.superadmin_claimed = true;
        }
        state.users.insert(user.principal().clone(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.users.contains_key(user.principal()) {
            return Err(UserRepositoryError::NotFound(user.principal().clone()));
        }
        if user.role() == Role::Superadmin {
            state.superadmin_claimed = true;
        }
        state.users.insert(user.principal().clone(), user.clone());
        Ok(())
    }

    async fn find_by_principal(&self, principal: &Principal) -> UserRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(|err| {
            UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.users.get(principal).cloned())
    }

    async fn list_by_status(&self, status: UserStatus) -> UserRepositoryResult<Vec<User>> {
        let state = self.state.read().map_err(|err| {
            UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut users: Vec<User> = state
            .users
            .values()
            .filter(|user| user.status() == status)
            .cloned()
            .collect();
        users.sort_by_key(User::created_at);
        Ok(users)
    }

    async fn list_all(&self) -> UserRepositoryResult<Vec<User>> {
        let state = self.state.read().map_err(|err| {
            UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by_key(User::created_at);
        Ok(users)
    }

    async fn claim_superadmin(&self, candidate: &User) -> UserRepositoryResult<User> {
        let mut state = self.state.write().map_err(|err| {
            UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.superadmin_claimed {
            return Err(UserRepositoryError::SuperadminAlreadyClaimed);
        }

        // First caller wins: every path below marks the claim taken before
        // the lock is released.
        let claimed = match state.users.get(candidate.principal()) {
            Some(existing) => {
                let mut upgraded = existing.clone();
                upgraded.promote_to_superadmin(candidate.updated_at());
                upgraded
            }
            None => candidate.clone(),
        };
        state.superadmin_claimed = true;
        state
            .users
            .insert(claimed.principal().clone(), claimed.clone());
        Ok(claimed)
    }
}
