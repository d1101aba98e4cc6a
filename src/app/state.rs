//! Application state management.
//!
//! This module provides the shared application state: one service per
//! entity, each hidden behind the `Service` trait so callers never know
//! which decorators or backend sit underneath.

use std::sync::Arc;

use validator::Validate;

use crate::domain::{Book, Category, Entity, Loan, Service, User};
use crate::infra::PostgresClient;

use super::instrumented::InstrumentedService;
use super::validation::ValidationMiddleware;

/// Shared application state.
///
/// # Thread Safety
///
/// All contained services are wrapped in `Arc` and implement `Send + Sync`,
/// making `AppState` safe to share across async tasks.
///
/// # Example
///
/// ```ignore
/// let db = PostgresClient::with_defaults(&database_url).await?;
/// let state = AppState::from_postgres(&db);
///
/// let mut loan = Loan::new(book_id, user_id);
/// state.loans.create(&mut loan).await?;
/// ```
#[derive(Clone)]
pub struct AppState {
    pub books: Arc<dyn Service<Book>>,
    pub categories: Arc<dyn Service<Category>>,
    pub users: Arc<dyn Service<User>>,
    pub loans: Arc<dyn Service<Loan>>,
}

impl AppState {
    /// Creates a new `AppState` from already composed services.
    #[must_use]
    pub fn new(
        books: Arc<dyn Service<Book>>,
        categories: Arc<dyn Service<Category>>,
        users: Arc<dyn Service<User>>,
        loans: Arc<dyn Service<Loan>>,
    ) -> Self {
        Self {
            books,
            categories,
            users,
            loans,
        }
    }

    /// Wraps each backend service in validation and instrumentation.
    ///
    /// Calls flow instrumentation → validation → backend, so rejected
    /// payloads are counted as `invalid` without reaching the backend.
    #[must_use]
    pub fn with_middleware(
        books: Arc<dyn Service<Book>>,
        categories: Arc<dyn Service<Category>>,
        users: Arc<dyn Service<User>>,
        loans: Arc<dyn Service<Loan>>,
    ) -> Self {
        Self::new(
            decorate(books),
            decorate(categories),
            decorate(users),
            decorate(loans),
        )
    }

    /// Builds the production stack on top of PostgreSQL.
    #[must_use]
    pub fn from_postgres(db: &PostgresClient) -> Self {
        Self::with_middleware(
            Arc::new(db.service::<Book>()),
            Arc::new(db.service::<Category>()),
            Arc::new(db.service::<User>()),
            Arc::new(db.service::<Loan>()),
        )
    }
}

fn decorate<T: Entity + Validate>(backend: Arc<dyn Service<T>>) -> Arc<dyn Service<T>> {
    let validated: Arc<dyn Service<T>> = Arc::new(ValidationMiddleware::new(backend));
    Arc::new(InstrumentedService::new(validated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::observability::OPERATIONS_TOTAL;
    use crate::test_utils::MockService;
    use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
    use std::sync::Mutex;
    use uuid::Uuid;

    /// Records the labels of every counter registration.
    #[derive(Default)]
    struct CapturingRecorder {
        counters: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl CapturingRecorder {
        fn outcomes(&self) -> Vec<String> {
            self.counters
                .lock()
                .unwrap()
                .iter()
                .filter(|(name, _)| name == OPERATIONS_TOTAL)
                .filter_map(|(_, labels)| {
                    labels
                        .iter()
                        .find(|(key, _)| key == "outcome")
                        .map(|(_, value)| value.clone())
                })
                .collect()
        }
    }

    impl Recorder for CapturingRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            let labels = key
                .labels()
                .map(|l| (l.key().to_string(), l.value().to_string()))
                .collect();
            self.counters
                .lock()
                .unwrap()
                .push((key.name().to_string(), labels));
            Counter::noop()
        }

        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    fn mocked_state() -> (AppState, Arc<MockService<Loan>>) {
        let loans = Arc::new(MockService::<Loan>::new().with_create(|_| Ok(())));
        let state = AppState::with_middleware(
            Arc::new(MockService::<Book>::new()),
            Arc::new(MockService::<Category>::new()),
            Arc::new(MockService::<User>::new()),
            Arc::clone(&loans) as Arc<dyn Service<Loan>>,
        );
        (state, loans)
    }

    #[tokio::test]
    async fn test_state_routes_through_validation() {
        let (state, loans) = mocked_state();

        let mut invalid = Loan::new(Uuid::nil(), Uuid::new_v4());
        assert!(state.loans.create(&mut invalid).await.is_err());
        assert!(loans.create_calls().is_empty());

        let mut valid = Loan::new(Uuid::new_v4(), Uuid::new_v4());
        state.loans.create(&mut valid).await.unwrap();
        assert_eq!(loans.create_calls(), vec![valid]);
    }

    #[test]
    fn test_app_state_is_clone() {
        let (state, _) = mocked_state();
        let cloned = state.clone();

        assert!(Arc::ptr_eq(&state.loans, &cloned.loans));
        assert!(Arc::ptr_eq(&state.books, &cloned.books));
    }

    #[test]
    fn test_rejected_payload_counted_as_invalid() {
        let (state, loans) = mocked_state();
        let recorder = CapturingRecorder::default();

        metrics::with_local_recorder(&recorder, || {
            tokio_test::block_on(async {
                let mut invalid = Loan::new(Uuid::nil(), Uuid::new_v4());
                let err = state.loans.create(&mut invalid).await.unwrap_err();
                assert!(err.is_validation());

                let mut valid = Loan::new(Uuid::new_v4(), Uuid::new_v4());
                state.loans.create(&mut valid).await.unwrap();
            });
        });

        assert_eq!(recorder.outcomes(), vec!["invalid", "ok"]);
        assert_eq!(loans.create_calls().len(), 1);
    }
}
