//! Application state for shared services

use std::sync::Arc;

use crate::domain::cache::Cache;
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::user::{
    CreateUserRequest, PasswordHasher, UpdateUserRequest, UserService,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceApi>,
    /// Held separately so the readiness probe can check the cache store
    /// without going through a user operation.
    pub cache: Arc<dyn Cache>,
}

impl AppState {
    pub fn new(user_service: Arc<dyn UserServiceApi>, cache: Arc<dyn Cache>) -> Self {
        Self {
            user_service,
            cache,
        }
    }
}

/// Trait for user service operations exposed to handlers
#[async_trait::async_trait]
pub trait UserServiceApi: Send + Sync {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError>;
    async fn update(
        &self,
        id: UserId,
        request: UpdateUserRequest,
    ) -> Result<Option<User>, DomainError>;
    async fn delete(&self, id: UserId) -> Result<bool, DomainError>;
    async fn list(&self) -> Result<Vec<User>, DomainError>;
}

#[async_trait::async_trait]
impl<R: UserRepository, H: PasswordHasher> UserServiceApi for UserService<R, H> {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        UserService::create(self, request).await
    }

    async fn update(
        &self,
        id: UserId,
        request: UpdateUserRequest,
    ) -> Result<Option<User>, DomainError> {
        UserService::update(self, id, request).await
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        UserService::delete(self, id).await
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        UserService::list(self).await
    }
}
