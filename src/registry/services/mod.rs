//! Application services for registration and approval.

mod approval;
mod registration;

pub use approval::{ApprovalError, ApprovalResult, ApprovalService, UserApprovalInfo};
pub use registration::{
    ClientRegistrationRequest, RegistrationError, RegistrationResult, RegistrationService,
};
