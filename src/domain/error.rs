//! Application error types with proper error chaining.

use thiserror::Error;

/// SQLSTATE raised for a violated foreign key constraint.
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// SQLSTATE raised for a violated unique constraint.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug, Clone)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Query execution failed: {0}")]
    Query(String),
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Duplicate record: {0}")]
    Duplicate(String),
    #[error("Referenced record does not exist: {0}")]
    ForeignKeyViolation(String),
    #[error("Pool exhausted: {0}")]
    PoolExhausted(String),
    #[error("Migration failed: {0}")]
    Migration(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Validation failed: {0}")]
    Multiple(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True when the error came from the validation layer.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    /// True when the targeted record does not exist or was soft-deleted.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Database(DatabaseError::NotFound(_)))
    }

    /// True when the write collided with a live record's unique key.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, AppError::Database(DatabaseError::Duplicate(_)))
    }

    /// True when the payload referenced a record that does not exist.
    #[must_use]
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            AppError::Database(DatabaseError::ForeignKeyViolation(_))
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(ValidationError::Multiple(err.to_string()))
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Row not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted("Pool timed out".to_string()),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some(FOREIGN_KEY_VIOLATION) => {
                    DatabaseError::ForeignKeyViolation(db_err.message().to_string())
                }
                Some(UNIQUE_VIOLATION) => DatabaseError::Duplicate(db_err.message().to_string()),
                _ => DatabaseError::Query(db_err.message().to_string()),
            },
            _ => DatabaseError::Query(err.to_string()),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(DatabaseError::from(err))
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(DatabaseError::Migration(err.to_string()))
    }
}
