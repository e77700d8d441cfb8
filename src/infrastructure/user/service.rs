//! User service: cache-aside reads and cache-coherent writes
//!
//! The cache is a disposable projection of the `users` table. Reads go
//! cache-first and repopulate on a miss; writes go to storage first and
//! then update or drop the cache entry. Cache failures are propagated, not
//! absorbed: an operator should see a failing cache as errors, not as a
//! silent shift of the full read load onto the database.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::domain::cache::{Cache, CacheExt};
use crate::domain::user::{NewUser, User, UserId, UserPatch, UserRepository};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request for updating an existing user; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// User service implementing cache-aside reads and write-through cache
/// maintenance over a [`UserRepository`] and a [`Cache`].
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    cache: Arc<dyn Cache>,
    hasher: Arc<H>,
    cache_ttl: Duration,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service. All collaborators are injected; the
    /// service holds no shared mutable state of its own.
    pub fn new(
        repository: Arc<R>,
        cache: Arc<dyn Cache>,
        hasher: Arc<H>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            cache,
            hasher,
            cache_ttl,
        }
    }

    /// Read a user by id.
    ///
    /// Consults the cache first; on a clean miss falls back to storage and
    /// repopulates the cache with the configured TTL. `Ok(None)` means the
    /// user exists in neither place; no cache entry is written for absent
    /// ids. Cache errors on either leg fail the read.
    pub async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let key = id.cache_key();

        if let Some(user) = self.cache.get::<User>(&key).await? {
            debug!(%id, "user served from cache");
            return Ok(Some(user));
        }

        debug!(%id, "cache miss, reading user from storage");
        let Some(user) = self.repository.get(id).await? else {
            return Ok(None);
        };

        self.cache.set(&key, &user, self.cache_ttl).await?;
        debug!(%id, "user cached after storage read");

        Ok(Some(user))
    }

    /// Create a user. Storage assigns the id; the fully-identified user is
    /// then written to the cache. No entry can pre-exist for a fresh id, so
    /// this is a pure insert on the cache side.
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        validate_name(&request.name)?;
        validate_email(&request.email)?;
        validate_password(&request.password)?;

        let password_hash = self.hasher.hash(&request.password)?;

        let user = self
            .repository
            .create(NewUser {
                name: request.name,
                email: request.email,
                password_hash,
            })
            .await?;

        self.cache
            .set(&user.id().cache_key(), &user, self.cache_ttl)
            .await?;
        debug!(id = %user.id(), "user created and cached");

        Ok(user)
    }

    /// Update a user. The patch is applied in storage, the authoritative
    /// row is re-read, and only that row is written back to the cache, so
    /// the cached value always reflects exactly what storage computed.
    /// `Ok(None)` when no such user exists.
    pub async fn update(
        &self,
        id: UserId,
        request: UpdateUserRequest,
    ) -> Result<Option<User>, DomainError> {
        if let Some(name) = &request.name {
            validate_name(name)?;
        }
        if let Some(email) = &request.email {
            validate_email(email)?;
        }
        let password_hash = match &request.password {
            Some(password) => {
                validate_password(password)?;
                Some(self.hasher.hash(password)?)
            }
            None => None,
        };

        let patch = UserPatch {
            name: request.name,
            email: request.email,
            password_hash,
        };
        if patch.is_empty() {
            return Err(DomainError::validation("no fields to update"));
        }

        if !self.repository.update(id, &patch).await? {
            return Ok(None);
        }

        // Re-read rather than caching a client-side merge; the row may
        // differ from the patch (defaults, triggers, concurrent writes).
        let Some(user) = self.repository.get(id).await? else {
            return Ok(None);
        };

        self.cache
            .set(&id.cache_key(), &user, self.cache_ttl)
            .await?;
        debug!(%id, "user updated and recached");

        Ok(Some(user))
    }

    /// Delete a user. The durable row goes first; the cache entry is only
    /// removed once the durable delete has succeeded, so a storage failure
    /// never leaves the cache missing an entry for a row that still exists.
    pub async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let deleted = self.repository.delete(id).await?;

        self.cache.delete(&id.cache_key()).await?;
        debug!(%id, deleted, "user delete completed, cache entry dropped");

        Ok(deleted)
    }

    /// List all users straight from storage. Listing is deliberately not
    /// cache-accelerated; only lookup-by-id is.
    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.repository.list().await
    }
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name must not be empty"));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(DomainError::validation("email must be a valid address"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.len() < 8 {
        return Err(DomainError::validation(
            "password must be at least 8 characters",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::repository::mock::MockCache;
    use crate::domain::user::repository::mock::MockUserRepository;
    use crate::infrastructure::user::password::plain::PlainHasher;

    const TTL: Duration = Duration::from_secs(60);

    fn service(
        repository: MockUserRepository,
        cache: Arc<MockCache>,
    ) -> UserService<MockUserRepository, PlainHasher> {
        UserService::new(
            Arc::new(repository),
            cache,
            Arc::new(PlainHasher),
            TTL,
        )
    }

    fn seeded_user(id: u64, name: &str, email: &str) -> User {
        User::new(UserId::new(id).unwrap(), name, email, format!("plain:pw-{}", id))
    }

    fn make_request(name: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: "longenough".to_string(),
        }
    }

    #[tokio::test]
    async fn cold_read_hits_storage_once_and_populates_cache() {
        let cache = Arc::new(MockCache::new());
        let service = service(
            MockUserRepository::new().with_user(seeded_user(7, "Ann", "a@x.com")),
            cache.clone(),
        );
        let id = UserId::new(7).unwrap();

        let user = service.get(id).await.unwrap().unwrap();

        assert_eq!(user.name(), "Ann");
        assert_eq!(service.repository.get_calls(), 1);
        assert_eq!(cache.set_calls(), 1);
        assert!(cache.contains("7"));
    }

    #[tokio::test]
    async fn warm_read_skips_storage() {
        let cache = Arc::new(MockCache::new());
        let service = service(
            MockUserRepository::new().with_user(seeded_user(7, "Ann", "a@x.com")),
            cache.clone(),
        );
        let id = UserId::new(7).unwrap();

        let first = service.get(id).await.unwrap().unwrap();
        let second = service.get(id).await.unwrap().unwrap();

        assert_eq!(first.name(), second.name());
        assert_eq!(first.email(), second.email());
        // One durable read for the cold call, none for the warm one.
        assert_eq!(service.repository.get_calls(), 1);
        assert_eq!(cache.set_calls(), 1);
    }

    #[tokio::test]
    async fn absent_id_returns_none_without_caching() {
        let cache = Arc::new(MockCache::new());
        let service = service(MockUserRepository::new(), cache.clone());
        let id = UserId::new(42).unwrap();

        for _ in 0..3 {
            assert!(service.get(id).await.unwrap().is_none());
        }

        assert_eq!(cache.set_calls(), 0);
        assert!(!cache.contains("42"));
        // Every call falls through to storage; absence is never cached.
        assert_eq!(service.repository.get_calls(), 3);
    }

    #[tokio::test]
    async fn create_then_read_is_served_from_cache() {
        let cache = Arc::new(MockCache::new());
        let service = service(MockUserRepository::new(), cache.clone());

        let created = service.create(make_request("Ann", "a@x.com")).await.unwrap();
        assert_eq!(cache.set_calls(), 1);

        let read = service.get(created.id()).await.unwrap().unwrap();

        assert_eq!(read.id(), created.id());
        assert_eq!(read.name(), created.name());
        assert_eq!(read.email(), created.email());
        // The read never touched storage.
        assert_eq!(service.repository.get_calls(), 0);
    }

    #[tokio::test]
    async fn create_hashes_the_password() {
        let cache = Arc::new(MockCache::new());
        let service = service(MockUserRepository::new(), cache.clone());

        let created = service.create(make_request("Ann", "a@x.com")).await.unwrap();

        assert_eq!(created.password_hash(), "plain:longenough");
        // The cached value never contains the credential.
        let raw = cache.raw_value(&created.id().cache_key()).unwrap();
        assert!(!raw.contains("longenough"));
        assert!(!raw.contains("password"));
    }

    #[tokio::test]
    async fn create_rejects_invalid_input() {
        let cache = Arc::new(MockCache::new());
        let service = service(MockUserRepository::new(), cache.clone());

        let no_name = CreateUserRequest {
            name: " ".to_string(),
            ..make_request("Ann", "a@x.com")
        };
        assert!(service.create(no_name).await.is_err());

        let bad_email = make_request("Ann", "not-an-address");
        assert!(service.create(bad_email).await.is_err());

        let short_password = CreateUserRequest {
            password: "short".to_string(),
            ..make_request("Ann", "a@x.com")
        };
        assert!(service.create(short_password).await.is_err());

        assert_eq!(cache.set_calls(), 0);
    }

    #[tokio::test]
    async fn update_recaches_the_authoritative_row() {
        let cache = Arc::new(
            MockCache::new().with_entry("7", &seeded_user(7, "Stale", "old@x.com"), Some(TTL)),
        );
        let service = service(
            MockUserRepository::new().with_user(seeded_user(7, "Ann", "a@x.com")),
            cache.clone(),
        );
        let id = UserId::new(7).unwrap();

        let updated = service
            .update(
                id,
                UpdateUserRequest {
                    name: Some("Ann B".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name(), "Ann B");

        // The pre-update cache entry is gone; the next read serves the
        // patched value from cache without touching storage.
        let reads_before = service.repository.get_calls();
        let read = service.get(id).await.unwrap().unwrap();
        assert_eq!(read.name(), "Ann B");
        assert_eq!(read.email(), "a@x.com");
        assert_eq!(service.repository.get_calls(), reads_before);
    }

    #[tokio::test]
    async fn update_missing_user_returns_none() {
        let cache = Arc::new(MockCache::new());
        let service = service(MockUserRepository::new(), cache.clone());

        let result = service
            .update(
                UserId::new(9).unwrap(),
                UpdateUserRequest {
                    name: Some("Ghost".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(cache.set_calls(), 0);
    }

    #[tokio::test]
    async fn update_with_no_fields_is_rejected() {
        let cache = Arc::new(MockCache::new());
        let service = service(
            MockUserRepository::new().with_user(seeded_user(7, "Ann", "a@x.com")),
            cache.clone(),
        );

        let result = service
            .update(UserId::new(7).unwrap(), UpdateUserRequest::default())
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn delete_removes_row_and_cache_entry() {
        let cache = Arc::new(MockCache::new());
        let service = service(
            MockUserRepository::new().with_user(seeded_user(7, "Ann", "a@x.com")),
            cache.clone(),
        );
        let id = UserId::new(7).unwrap();

        // Warm the cache first.
        service.get(id).await.unwrap();
        assert!(cache.contains("7"));

        assert!(service.delete(id).await.unwrap());
        assert!(!cache.contains("7"));

        // The next read is a cache miss, falls through to storage and
        // finds nothing.
        let reads_before = service.repository.get_calls();
        assert!(service.get(id).await.unwrap().is_none());
        assert_eq!(service.repository.get_calls(), reads_before + 1);
    }

    #[tokio::test]
    async fn failed_durable_delete_leaves_cache_untouched() {
        let cache = Arc::new(
            MockCache::new().with_entry("7", &seeded_user(7, "Ann", "a@x.com"), Some(TTL)),
        );
        let service = service(MockUserRepository::new().failing("db down"), cache.clone());

        let result = service.delete(UserId::new(7).unwrap()).await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
        // The cached entry still reflects a row that still exists.
        assert!(cache.contains("7"));
        assert_eq!(cache.delete_calls(), 0);
    }

    #[tokio::test]
    async fn cache_delete_failure_fails_delete() {
        let cache = Arc::new(MockCache::new().fail_delete("redis unreachable"));
        let service = service(
            MockUserRepository::new().with_user(seeded_user(7, "Ann", "a@x.com")),
            cache.clone(),
        );
        let id = UserId::new(7).unwrap();

        let result = service.delete(id).await;

        assert!(matches!(result, Err(DomainError::Cache { .. })));
        assert_eq!(cache.delete_calls(), 1);
        // The durable row is already gone; only the cache drop failed, and
        // any stale entry is bounded by the TTL.
        assert!(service.repository.get(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_cache_entry_is_an_error_not_a_miss() {
        let cache = Arc::new(MockCache::new().with_raw_entry("7", "{definitely not json"));
        let service = service(
            MockUserRepository::new().with_user(seeded_user(7, "Ann", "a@x.com")),
            cache.clone(),
        );

        let result = service.get(UserId::new(7).unwrap()).await;

        assert!(matches!(result, Err(DomainError::Serialization { .. })));
        // Storage must not have been consulted; the failure is surfaced.
        assert_eq!(service.repository.get_calls(), 0);
    }

    #[tokio::test]
    async fn empty_cache_value_is_a_clean_miss() {
        let cache = Arc::new(MockCache::new().with_raw_entry("7", ""));
        let service = service(
            MockUserRepository::new().with_user(seeded_user(7, "Ann", "a@x.com")),
            cache.clone(),
        );

        let user = service.get(UserId::new(7).unwrap()).await.unwrap().unwrap();

        assert_eq!(user.name(), "Ann");
        assert_eq!(service.repository.get_calls(), 1);
    }

    #[tokio::test]
    async fn cache_get_error_fails_read() {
        let cache = Arc::new(MockCache::new().fail_get("redis unreachable"));
        let service = service(
            MockUserRepository::new().with_user(seeded_user(7, "Ann", "a@x.com")),
            cache.clone(),
        );

        let result = service.get(UserId::new(7).unwrap()).await;

        // Strict policy: a failing cache is visible, storage is not
        // silently consulted instead.
        assert!(matches!(result, Err(DomainError::Cache { .. })));
        assert_eq!(service.repository.get_calls(), 0);
    }

    #[tokio::test]
    async fn recache_failure_fails_read() {
        let cache = Arc::new(MockCache::new().fail_set("redis write refused"));
        let service = service(
            MockUserRepository::new().with_user(seeded_user(7, "Ann", "a@x.com")),
            cache.clone(),
        );

        let result = service.get(UserId::new(7).unwrap()).await;

        assert!(matches!(result, Err(DomainError::Cache { .. })));
    }

    #[tokio::test]
    async fn cache_write_failure_fails_create() {
        let cache = Arc::new(MockCache::new().fail_set("redis write refused"));
        let service = service(MockUserRepository::new(), cache.clone());

        let result = service.create(make_request("Ann", "a@x.com")).await;

        assert!(matches!(result, Err(DomainError::Cache { .. })));
    }

    #[tokio::test]
    async fn list_bypasses_the_cache() {
        let cache = Arc::new(MockCache::new());
        let service = service(
            MockUserRepository::new()
                .with_user(seeded_user(1, "Ann", "a@x.com"))
                .with_user(seeded_user(2, "Bea", "b@x.com")),
            cache.clone(),
        );

        let users = service.list().await.unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(cache.get_calls(), 0);
        assert_eq!(cache.set_calls(), 0);
    }

    #[tokio::test]
    async fn full_lifecycle_walkthrough() {
        // Durable storage holds {id:7, name:"Ann", email:"a@x.com"}.
        let cache = Arc::new(MockCache::new());
        let service = service(
            MockUserRepository::new().with_user(seeded_user(7, "Ann", "a@x.com")),
            cache.clone(),
        );
        let id = UserId::new(7).unwrap();

        // Cold read: one durable query, one cache write under key "7".
        let first = service.get(id).await.unwrap().unwrap();
        assert_eq!(first.name(), "Ann");
        assert_eq!(service.repository.get_calls(), 1);
        assert_eq!(cache.set_calls(), 1);
        assert!(cache.contains("7"));

        // Warm read: zero durable queries, identical record.
        let second = service.get(id).await.unwrap().unwrap();
        assert_eq!(second.name(), first.name());
        assert_eq!(second.email(), first.email());
        assert_eq!(service.repository.get_calls(), 1);

        // Delete: row and cache key "7" are both gone.
        assert!(service.delete(id).await.unwrap());
        assert!(!cache.contains("7"));

        // Final read: absent everywhere, no error.
        assert!(service.get(id).await.unwrap().is_none());
    }
}
