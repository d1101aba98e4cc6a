//! Tracing and metrics decorator.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use metrics::{counter, histogram};
use tracing::{Instrument, debug, info_span, warn};

use crate::domain::{AppError, Entity, Service};
use crate::infra::observability::{OPERATION_DURATION_SECONDS, OPERATIONS_TOTAL};

/// Decorator recording a span, an outcome counter and a latency histogram
/// for every call. Results pass through untouched.
pub struct InstrumentedService<T: Entity> {
    inner: Arc<dyn Service<T>>,
}

impl<T: Entity> InstrumentedService<T> {
    #[must_use]
    pub fn new(inner: Arc<dyn Service<T>>) -> Self {
        Self { inner }
    }

    async fn observe<R, F>(operation: &'static str, call: F) -> Result<R, AppError>
    where
        F: Future<Output = Result<R, AppError>>,
    {
        let span = info_span!("service_call", entity = T::NAME, operation);
        async move {
            let started = Instant::now();
            let result = call.await;
            let elapsed = started.elapsed();

            let outcome = match &result {
                Ok(_) => {
                    debug!(elapsed_ms = elapsed.as_millis() as u64, "Call succeeded");
                    "ok"
                }
                Err(e) if e.is_validation() => "invalid",
                Err(e) => {
                    warn!(error = %e, elapsed_ms = elapsed.as_millis() as u64, "Call failed");
                    "error"
                }
            };

            counter!(
                OPERATIONS_TOTAL,
                "entity" => T::NAME,
                "operation" => operation,
                "outcome" => outcome
            )
            .increment(1);
            histogram!(
                OPERATION_DURATION_SECONDS,
                "entity" => T::NAME,
                "operation" => operation
            )
            .record(elapsed.as_secs_f64());

            result
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl<T: Entity> Service<T> for InstrumentedService<T> {
    async fn create(&self, entity: &mut T) -> Result<(), AppError> {
        Self::observe("create", self.inner.create(entity)).await
    }

    async fn update(&self, entity: &T) -> Result<T, AppError> {
        Self::observe("update", self.inner.update(entity)).await
    }

    async fn delete(&self, entity: &T) -> Result<(), AppError> {
        Self::observe("delete", self.inner.delete(entity)).await
    }

    async fn find(&self, entity: &T) -> Result<T, AppError> {
        Self::observe("find", self.inner.find(entity)).await
    }

    async fn find_all(&self) -> Result<Vec<T>, AppError> {
        Self::observe("find_all", self.inner.find_all()).await
    }
}
