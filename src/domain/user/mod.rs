//! User entity and storage port

pub mod entity;
pub mod repository;

pub use entity::{NewUser, User, UserId, UserPatch};
pub use repository::UserRepository;
