//! User directory API
//!
//! A small HTTP service managing users in PostgreSQL with a Redis
//! read-through cache in front of lookup-by-id. Reads are cache-aside:
//! check the cache, fall back to the database on a miss, repopulate the
//! cache. Writes keep the cache coherent by recaching after storage
//! commits (create, update) or dropping the entry (delete).

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use api::state::AppState;
use config::CacheBackend;
use infrastructure::cache::{InMemoryCache, RedisCache};
use infrastructure::user::{Argon2Hasher, PostgresUserRepository, UserService};

/// Create the application state with all collaborators constructed once
/// and injected; nothing in the core reaches for globals.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    info!("Connecting to PostgreSQL");
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .map_err(|e| anyhow::anyhow!("failed to connect to PostgreSQL: {}", e))?;

    // Verify the connection before serving traffic.
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("failed to ping PostgreSQL: {}", e))?;
    info!("PostgreSQL connection established");

    let cache: Arc<dyn domain::cache::Cache> = match config.cache.backend {
        CacheBackend::Redis => {
            info!("Connecting to Redis");
            let cache = RedisCache::with_url(config.cache.url.clone())
                .await
                .map_err(|e| anyhow::anyhow!("failed to connect to Redis: {}", e))?;
            info!("Redis connection established");
            Arc::new(cache)
        }
        CacheBackend::Memory => {
            info!("Using in-process memory cache");
            Arc::new(InMemoryCache::new())
        }
    };

    let repository = Arc::new(PostgresUserRepository::new(pool));
    let hasher = Arc::new(Argon2Hasher::new());
    let user_service = Arc::new(UserService::new(
        repository,
        cache.clone(),
        hasher,
        Duration::from_secs(config.cache.ttl_secs),
    ));

    Ok(AppState::new(user_service, cache))
}
