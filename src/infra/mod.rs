//! Infrastructure layer implementations.

pub mod config;
pub mod database;
pub mod observability;

pub use config::AppConfig;
pub use database::{PgService, PostgresClient, PostgresConfig, Table};
pub use observability::{LogFormat, init_metrics, init_tracing};
