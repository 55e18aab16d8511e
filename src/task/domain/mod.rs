//! Domain model for the task delegation lifecycle.
//!
//! A task moves between client, internal staff and partner hands along a
//! fixed status graph: the client requests, internal staff estimate, the
//! client approves the estimate, staff delegate to a partner, the partner
//! accepts or rejects, and accepted work cycles through QA and client
//! review until completion settles it.

mod error;
mod ids;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use task::{InternalData, PersistedTaskData, Task, TaskStatus};
