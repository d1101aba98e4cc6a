//! Domain traits defining contracts for persistence and its decorators.

use async_trait::async_trait;

use super::error::AppError;
use super::types::Entity;

/// The capability set every entity exposes.
///
/// Implemented once per concern (persistence, instrumentation, validation)
/// and composed by wrapping an `Arc<dyn Service<T>>`. Dropping a returned
/// future cancels the underlying call.
#[async_trait]
pub trait Service<T: Entity>: Send + Sync {
    /// Persist a new record, filling in its generated id and timestamps.
    async fn create(&self, entity: &mut T) -> Result<(), AppError>;

    /// Overwrite the live record identified by `entity.id()`.
    async fn update(&self, entity: &T) -> Result<T, AppError>;

    /// Soft-delete the live record identified by `entity.id()`.
    async fn delete(&self, entity: &T) -> Result<(), AppError>;

    /// Load the live record identified by `entity.id()`.
    async fn find(&self, entity: &T) -> Result<T, AppError>;

    /// Load every live record.
    async fn find_all(&self) -> Result<Vec<T>, AppError>;
}
