//! CLI for the user directory service
//!
//! Subcommands:
//! - `serve`: run the HTTP API
//! - `migrate`: apply pending database migrations

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// User directory API - PostgreSQL-backed user store with a Redis
/// read-through cache
#[derive(Parser)]
#[command(name = "user-directory")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,

    /// Apply pending database migrations
    Migrate,
}
