//! Infrastructure layer - store-backed implementations of the domain ports

pub mod cache;
pub mod logging;
pub mod user;
