//! Validation middleware.
//!
//! Wraps any [`Service`] and rejects invalid payloads before they reach the
//! wrapped service. Reads pass straight through.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;
use validator::Validate;

use crate::domain::{AppError, Entity, Service, ValidationError};

/// Decorator running business validation ahead of create, update and delete.
///
/// On failure the wrapped service is never called.
pub struct ValidationMiddleware<T: Entity> {
    inner: Arc<dyn Service<T>>,
}

impl<T: Entity> ValidationMiddleware<T> {
    #[must_use]
    pub fn new(inner: Arc<dyn Service<T>>) -> Self {
        Self { inner }
    }
}

fn validate_fields<T: Entity + Validate>(entity: &T, operation: &str) -> Result<(), AppError> {
    entity.validate().map_err(|e| {
        warn!(entity = T::NAME, operation, error = %e, "Validation failed");
        AppError::from(e)
    })
}

fn require_id<T: Entity>(entity: &T, operation: &str) -> Result<(), AppError> {
    if entity.model().is_new() {
        warn!(entity = T::NAME, operation, "Validation failed: missing id");
        return Err(AppError::Validation(ValidationError::MissingField(
            "id".to_string(),
        )));
    }
    Ok(())
}

#[async_trait]
impl<T> Service<T> for ValidationMiddleware<T>
where
    T: Entity + Validate,
{
    async fn create(&self, entity: &mut T) -> Result<(), AppError> {
        validate_fields(&*entity, "create")?;
        self.inner.create(entity).await
    }

    async fn update(&self, entity: &T) -> Result<T, AppError> {
        require_id(entity, "update")?;
        validate_fields(entity, "update")?;
        self.inner.update(entity).await
    }

    async fn delete(&self, entity: &T) -> Result<(), AppError> {
        require_id(entity, "delete")?;
        self.inner.delete(entity).await
    }

    async fn find(&self, entity: &T) -> Result<T, AppError> {
        self.inner.find(entity).await
    }

    async fn find_all(&self) -> Result<Vec<T>, AppError> {
        self.inner.find_all().await
    }
}
