//! Error types for user registry domain validation.

use super::UserStatus;
use super::ids::Principal;
use thiserror::Error;

/// Errors returned while constructing or mutating registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryDomainError {
    /// The principal text is malformed.
    #[error("invalid principal '{0}'")]
    InvalidPrincipal(String),

    /// The display name is empty after trimming.
    #[error("display name must not be empty")]
    EmptyName,

    /// The requested role text does not name a registrable internal role.
    #[error("'{0}' is not a registrable internal role")]
    NotInternalRole(String),

    /// An approval decision was applied to a user that is not pending.
    #[error("user {principal} is {status} and cannot receive an approval decision")]
    InvalidStatusTransition {
        /// Principal of the target user.
        principal: Principal,
        /// Status the user held when the decision was attempted.
        status: UserStatus,
    },

    /// The superadmin role can only move through the one-time claim.
    #[error("the superadmin role cannot be assigned or revoked through role updates")]
    SuperadminRoleImmutable,
}

/// Error returned while parsing roles from persistence or caller input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

/// Error returned while parsing user statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown user status: {0}")]
pub struct ParseUserStatusError(pub String);
