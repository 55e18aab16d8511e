//! Application services for task lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{
    AssignPartnerRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
};
