//! Cache backends

pub mod in_memory;
pub mod redis;

pub use in_memory::{InMemoryCache, InMemoryCacheConfig};
pub use redis::{RedisCache, RedisCacheConfig};
