//! Engine facade exposing the remote-procedure surface.
//!
//! The [`engine::Engine`] composes the registry, ledger, task and finance
//! services over injected repositories and gates every operation on the
//! caller's role and approval status. Client-facing task projections live
//! in [`view`], including the delegation-churn masking.

pub mod engine;
pub mod error;
pub mod view;

pub use engine::{Engine, InMemoryEngine};
pub use error::{EngineError, EngineResult};
pub use view::{LABEL_SEDANG_DIDELEGASIKAN, TaskClientView, client_facing_label};

#[cfg(test)]
mod tests;
