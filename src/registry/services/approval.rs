//! Service layer for the approval workflow and role administration.

use crate::registry::{
    domain::{Principal, RegistryDomainError, Role, User, UserProfile, UserStatus},
    ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Approval status of a single registration, as listed to administrators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserApprovalInfo {
    /// Principal of the registrant.
    pub principal: Principal,
    /// Current registration status.
    pub status: UserStatus,
    /// Display name of the registrant.
    pub name: String,
    /// Requested role.
    pub role: Role,
}

/// Service-level errors for approval operations.
#[derive(Debug, Error)]
pub enum ApprovalError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] RegistryDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
    /// The target principal is not registered.
    #[error("user not found: {0}")]
    UserNotFound(Principal),
}

/// Result type for approval service operations.
pub type ApprovalResult<T> = Result<T, ApprovalError>;

/// Approval workflow orchestration service.
#[derive(Clone)]
pub struct ApprovalService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> ApprovalService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new approval service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Approves a pending registration.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::UserNotFound`] for unknown principals and
    /// [`RegistryDomainError::InvalidStatusTransition`] when the target is
    /// not pending.
    pub async fn approve_user(
        &self,
        approver: Principal,
        principal: &Principal,
    ) -> ApprovalResult<User> {
        let mut user = self.load(principal).await?;
        user.approve(approver, &*self.clock)?;
        self.repository.update(&user).await?;
        info!(principal = %user.principal(), "registration approved");
        Ok(user)
    }

    /// Rejects a pending registration. Rejection is terminal.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::UserNotFound`] for unknown principals and
    /// [`RegistryDomainError::InvalidStatusTransition`] when the target is
    /// not pending.
    pub async fn reject_user(
        &self,
        rejecter: Principal,
        principal: &Principal,
        reason: Option<String>,
    ) -> ApprovalResult<User> {
        let mut user = self.load(principal).await?;
        user.reject(rejecter, reason, &*self.clock)?;
        self.repository.update(&user).await?;
        warn!(principal = %user.principal(), "registration rejected");
        Ok(user)
    }

    /// Applies an approval decision chosen by status value.
    ///
    /// Convenience form used by callers that carry the decision as data;
    /// `Pending` is not a decision and is refused as an invalid transition.
    ///
    /// # Errors
    ///
    /// As for [`ApprovalService::approve_user`] and
    /// [`ApprovalService::reject_user`].
    pub async fn set_approval(
        &self,
        decider: Principal,
        principal: &Principal,
        status: UserStatus,
    ) -> ApprovalResult<User> {
        match status {
            UserStatus::Active => self.approve_user(decider, principal).await,
            UserStatus::Rejected => self.reject_user(decider, principal, None).await,
            UserStatus::Pending => {
                let user = self.load(principal).await?;
                Err(RegistryDomainError::InvalidStatusTransition {
                    principal: user.principal().clone(),
                    status: user.status(),
                }
                .into())
            }
        }
    }

    /// Lists every registration with its approval status.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Repository`] when the listing fails.
    pub async fn list_approvals(&self) -> ApprovalResult<Vec<UserApprovalInfo>> {
        let users = self.repository.list_all().await?;
        Ok(users.iter().map(approval_info).collect())
    }

    /// Returns the registrations still awaiting a decision.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Repository`] when the listing fails.
    pub async fn get_pending_requests(&self) -> ApprovalResult<Vec<User>> {
        Ok(self.repository.list_by_status(UserStatus::Pending).await?)
    }

    /// Replaces a user's role.
    ///
    /// The superadmin role is excluded in both directions: it is only
    /// reachable through the one-time claim and never revocable.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::SuperadminRoleImmutable`] when the
    /// change touches the superadmin role, and
    /// [`ApprovalError::UserNotFound`] for unknown principals.
    pub async fn update_user_role(
        &self,
        principal: &Principal,
        new_role: Role,
    ) -> ApprovalResult<User> {
        let mut user = self.load(principal).await?;
        if new_role == Role::Superadmin || user.role() == Role::Superadmin {
            return Err(RegistryDomainError::SuperadminRoleImmutable.into());
        }
        user.change_role(new_role, &*self.clock);
        self.repository.update(&user).await?;
        info!(principal = %user.principal(), role = %new_role, "user role updated");
        Ok(user)
    }

    /// Claims the system-wide superadmin role for `principal`.
    ///
    /// First caller wins; the transition is irreversible. An already
    /// registered principal is upgraded in place, an unknown principal is
    /// inserted as an active superadmin named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::SuperadminAlreadyClaimed`] on every
    /// call after the first successful claim.
    pub async fn claim_superadmin(
        &self,
        principal: Principal,
        name: impl Into<String> + Send,
    ) -> ApprovalResult<User> {
        let profile = UserProfile::new(name)?;
        let candidate = User::register_approved(
            principal.clone(),
            profile,
            Role::Superadmin,
            principal,
            &*self.clock,
        );
        let claimed = self.repository.claim_superadmin(&candidate).await?;
        info!(principal = %claimed.principal(), "superadmin claimed");
        Ok(claimed)
    }

    async fn load(&self, principal: &Principal) -> ApprovalResult<User> {
        self.repository
            .find_by_principal(principal)
            .await?
            .ok_or_else(|| ApprovalError::UserNotFound(principal.clone()))
    }
}

fn approval_info(user: &User) -> UserApprovalInfo {
    UserApprovalInfo {
        principal: user.principal().clone(),
        status: user.status(),
        name: user.profile().name().to_owned(),
        role: user.role(),
    }
}
