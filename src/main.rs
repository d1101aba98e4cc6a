//! Bootstraps the library database: applies migrations, verifies
//! connectivity and reports how many live records each table holds.

use anyhow::Result;
use dotenvy::dotenv;
use secrecy::ExposeSecret;
use tracing::info;

use library_service::app::AppState;
use library_service::infra::{AppConfig, PostgresClient, init_metrics, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_format)?;

    if let Some(addr) = config.metrics_addr {
        init_metrics(addr)?;
        info!(%addr, "Prometheus exporter listening");
    }

    let db = PostgresClient::new(config.database_url.expose_secret(), config.postgres.clone())
        .await?;
    if config.run_migrations {
        db.run_migrations().await?;
    }
    db.health_check().await?;

    let state = AppState::from_postgres(&db);
    let (categories, books, users, loans) = tokio::try_join!(
        state.categories.find_all(),
        state.books.find_all(),
        state.users.find_all(),
        state.loans.find_all(),
    )?;

    info!(
        categories = categories.len(),
        books = books.len(),
        users = users.len(),
        loans = loans.len(),
        "Library database ready"
    );

    Ok(())
}
