//! Cache port - key/value store with TTL and a JSON serialization boundary

pub mod repository;

pub use repository::{Cache, CacheExt};
