//! In-memory adapters for the user registry.

mod user;

pub use user::InMemoryUserRepository;
