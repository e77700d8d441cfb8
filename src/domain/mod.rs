//! Domain layer - entities, ports and errors

pub mod cache;
pub mod error;
pub mod user;

pub use error::DomainError;
pub use user::{User, UserId};
