//! Migrate command - applies pending sqlx migrations

use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&logging::LoggingConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.clone(),
    });

    info!("Connecting to PostgreSQL");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await?;

    info!("Applying migrations");
    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("Migrations applied");
    Ok(())
}
