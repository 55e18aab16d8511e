//! Repository port for user registry persistence and the superadmin claim.

use crate::registry::domain::{Principal, User, UserStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user repository operations.
pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::DuplicatePrincipal`] when the
    /// principal is already registered.
    async fn store(&self, user: &User) -> UserRepositoryResult<()>;

    /// Persists changes to an existing user (status, role, decision).
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the user does not
    /// exist.
    async fn update(&self, user: &User) -> UserRepositoryResult<()>;

    /// Finds a user by principal.
    ///
    /// Returns `None` when the principal is not registered.
    async fn find_by_principal(&self, principal: &Principal) -> UserRepositoryResult<Option<User>>;

    /// Returns all users holding the given status.
    async fn list_by_status(&self, status: UserStatus) -> UserRepositoryResult<Vec<User>>;

    /// Returns every registered user.
    async fn list_all(&self) -> UserRepositoryResult<Vec<User>>;

    /// Claims the system-wide superadmin role for `principal`.
    ///
    /// The claim is atomic: it checks for an existing superadmin and either
    /// upgrades the caller's record in place or inserts a fresh active
    /// superadmin, all within a single guarded section. First caller wins.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::SuperadminAlreadyClaimed`] on every
    /// call after the first successful claim, regardless of caller.
    async fn claim_superadmin(&self, candidate: &User) -> UserRepositoryResult<User>;
}

/// Errors returned by user repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserRepositoryError {
    /// A user with the same principal already exists.
    #[error("principal already registered: {0}")]
    DuplicatePrincipal(Principal),

    /// The user was not found.
    #[error("user not found: {0}")]
    NotFound(Principal),

    /// A superadmin has already been claimed.
    #[error("superadmin has already been claimed")]
    SuperadminAlreadyClaimed,

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
