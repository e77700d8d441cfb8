//! Cache trait definition

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::domain::DomainError;

/// Key-value cache with per-write expiration.
///
/// This trait uses JSON strings internally to be dyn-compatible. Use the
/// [`CacheExt`] helpers for typed get/set operations.
///
/// Contract: a missing key and an empty stored value are both `Ok(None)` -
/// absence is never an error. An `Err` always means the store itself failed
/// (unreachable, timed out, rejected the call); implementations never return
/// a value and an error from the same call. There is no retry and no
/// fallback at this layer.
#[async_trait]
pub trait Cache: Send + Sync + Debug {
    /// Gets the raw JSON value stored under `key`.
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Sets a raw JSON value under `key`, expiring `ttl` from now. Either
    /// the write fully takes effect or the key's prior state is unchanged.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError>;

    /// Deletes `key`, returning whether it existed. Deleting an absent key
    /// is not an error.
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;
}

/// Extension trait providing typed get/set operations
pub trait CacheExt: Cache {
    /// Gets a value from the cache and decodes it into `V`.
    ///
    /// A decode failure after a successful fetch is reported as
    /// [`DomainError::Serialization`], not as a miss: the entry existed but
    /// was corrupt or schema-mismatched, which is a distinct failure class.
    fn get<'a, V>(
        &'a self,
        key: &'a str,
    ) -> impl std::future::Future<Output = Result<Option<V>, DomainError>> + Send
    where
        V: DeserializeOwned + Send,
    {
        async move {
            match self.get_raw(key).await? {
                Some(data) if !data.is_empty() => {
                    let value: V = serde_json::from_str(&data).map_err(|e| {
                        DomainError::serialization(format!(
                            "failed to decode cache value for key '{}': {}",
                            key, e
                        ))
                    })?;
                    Ok(Some(value))
                }
                _ => Ok(None),
            }
        }
    }

    /// Encodes `value` as JSON and stores it under `key` with a TTL.
    /// A serialization failure leaves the key untouched.
    fn set<'a, V>(
        &'a self,
        key: &'a str,
        value: &'a V,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<(), DomainError>> + Send
    where
        V: Serialize + Send + Sync,
    {
        async move {
            let data = serde_json::to_string(value).map_err(|e| {
                DomainError::serialization(format!(
                    "failed to encode cache value for key '{}': {}",
                    key, e
                ))
            })?;
            self.set_raw(key, &data, ttl).await
        }
    }
}

// Blanket implementation for all types implementing Cache
impl<T: Cache + ?Sized> CacheExt for T {}
