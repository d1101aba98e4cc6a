//! PostgreSQL database client implementation.

use std::marker::PhantomData;
use std::time::Duration;

use sqlx::{FromRow, PgPool, postgres::PgPoolOptions, postgres::PgRow};
use tracing::{info, instrument};

use crate::domain::{AppError, DatabaseError, Entity, EntityId};

/// PostgreSQL connection pool configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(3),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

/// PostgreSQL database client with connection pooling
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client with custom configuration
    pub async fn new(database_url: &str, config: PostgresConfig) -> Result<Self, AppError> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect(database_url)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client with default configuration
    pub async fn with_defaults(database_url: &str) -> Result<Self, AppError> {
        Self::new(database_url, PostgresConfig::default()).await
    }

    /// Run database migrations using sqlx migrate
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Check database connectivity
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        Ok(())
    }

    /// Get the underlying connection pool (for testing)
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Persistence service for one entity table, sharing this client's pool.
    #[must_use]
    pub fn service<T: Table>(&self) -> PgService<T> {
        PgService::new(self.pool.clone())
    }
}

/// Table metadata for an entity stored in PostgreSQL.
pub trait Table: Entity + for<'r> FromRow<'r, PgRow> + Unpin {
    const TABLE: &'static str;
    /// Column list selected and returned for this entity, `Model` columns first.
    const COLUMNS: &'static str;
}

/// Persistence service translating each call into one SQL statement.
///
/// `create` and `update` are written per entity; the soft-delete aware
/// reads and deletes are shared here.
pub struct PgService<T> {
    pub(super) pool: PgPool,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for PgService<T> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<T> PgService<T> {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }
}

impl<T: Table> PgService<T> {
    pub(super) async fn fetch_live(&self, id: EntityId) -> Result<T, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1 AND deleted_at IS NULL",
            T::COLUMNS,
            T::TABLE
        );
        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found::<T>(id))
    }

    pub(super) async fn fetch_all_live(&self) -> Result<Vec<T>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE deleted_at IS NULL ORDER BY created_at ASC, id ASC",
            T::COLUMNS,
            T::TABLE
        );
        Ok(sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?)
    }

    pub(super) async fn soft_delete(&self, id: EntityId) -> Result<(), AppError> {
        let sql = format!(
            "UPDATE {} SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
            T::TABLE
        );
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(not_found::<T>(id));
        }
        info!(entity = T::NAME, id = %id, "Record soft-deleted");
        Ok(())
    }
}

pub(super) fn not_found<T: Entity>(id: EntityId) -> AppError {
    AppError::Database(DatabaseError::NotFound(format!("{} {}", T::NAME, id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Loan;

    #[test]
    fn test_postgres_config_default() {
        let config = PostgresConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.acquire_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_not_found_names_entity_and_id() {
        let id = uuid::Uuid::new_v4();
        let err = not_found::<Loan>(id);

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), format!("Record not found: loan {id}"));
    }
}
