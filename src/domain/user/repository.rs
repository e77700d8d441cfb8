//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUser, User, UserId, UserPatch};
use crate::domain::DomainError;

/// Repository trait for durable user storage.
///
/// Durable storage is the sole source of truth; the cache layered on top of
/// this port is a disposable projection. Absence is `Ok(None)` or
/// `Ok(false)`, never an error.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by id
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Insert a new user, returning it with the storage-assigned id
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Apply a patch to an existing user, returning whether a row matched
    async fn update(&self, id: UserId, patch: &UserPatch) -> Result<bool, DomainError>;

    /// Delete a user, returning whether a row was removed
    async fn delete(&self, id: UserId) -> Result<bool, DomainError>;

    /// List all users
    async fn list(&self) -> Result<Vec<User>, DomainError>;
}
