//! Domain model for the user registry and approval workflow.
//!
//! The registry binds external principals to exactly one platform role and
//! an approval status. It is the sole source of truth for authorization
//! checks performed by the rest of the system.

mod error;
mod ids;
mod user;

pub use error::{ParseRoleError, ParseUserStatusError, RegistryDomainError};
pub use ids::Principal;
pub use user::{ApprovalDecision, PersistedUserData, Role, User, UserProfile, UserStatus};
