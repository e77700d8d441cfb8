use clap::Parser;

use user_directory::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => user_directory::cli::serve::run().await,
        Command::Migrate => user_directory::cli::migrate::run().await,
    }
}
