//! Mock implementations for testing.
//!
//! [`MockService`] implements [`Service`] by delegating every method to a
//! closure supplied by the test, and records the arguments of each call so
//! tests can assert on what reached it.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{AppError, Entity, Service};

type CreateFn<T> = Box<dyn Fn(&mut T) -> Result<(), AppError> + Send + Sync>;
type UpdateFn<T> = Box<dyn Fn(&T) -> Result<T, AppError> + Send + Sync>;
type DeleteFn<T> = Box<dyn Fn(&T) -> Result<(), AppError> + Send + Sync>;
type FindFn<T> = Box<dyn Fn(&T) -> Result<T, AppError> + Send + Sync>;
type FindAllFn<T> = Box<dyn Fn() -> Result<Vec<T>, AppError> + Send + Sync>;

/// Arguments of every call, in call order.
struct CallLog<T> {
    create: Vec<T>,
    update: Vec<T>,
    delete: Vec<T>,
    find: Vec<T>,
    find_all: usize,
}

impl<T> Default for CallLog<T> {
    fn default() -> Self {
        Self {
            create: Vec::new(),
            update: Vec::new(),
            delete: Vec::new(),
            find: Vec::new(),
            find_all: 0,
        }
    }
}

/// Mock service for testing.
///
/// Calling a method whose handler was not configured panics: that is a bug
/// in the test setup, not a runtime condition.
///
/// # Example
///
/// ```ignore
/// use library_service::domain::Loan;
/// use library_service::test_utils::MockService;
///
/// let mock = MockService::<Loan>::new()
///     .with_create(|_| Ok(()))
///     .with_find_all(|| Ok(Vec::new()));
///
/// assert!(mock.create_calls().is_empty());
/// ```
pub struct MockService<T: Entity> {
    create_fn: Option<CreateFn<T>>,
    update_fn: Option<UpdateFn<T>>,
    delete_fn: Option<DeleteFn<T>>,
    find_fn: Option<FindFn<T>>,
    find_all_fn: Option<FindAllFn<T>>,
    calls: RwLock<CallLog<T>>,
}

impl<T: Entity> MockService<T> {
    /// Creates a mock with no handlers configured.
    #[must_use]
    pub fn new() -> Self {
        Self {
            create_fn: None,
            update_fn: None,
            delete_fn: None,
            find_fn: None,
            find_all_fn: None,
            calls: RwLock::new(CallLog::default()),
        }
    }

    #[must_use]
    pub fn with_create<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut T) -> Result<(), AppError> + Send + Sync + 'static,
    {
        self.create_fn = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn with_update<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Result<T, AppError> + Send + Sync + 'static,
    {
        self.update_fn = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn with_delete<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Result<(), AppError> + Send + Sync + 'static,
    {
        self.delete_fn = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn with_find<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Result<T, AppError> + Send + Sync + 'static,
    {
        self.find_fn = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn with_find_all<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<Vec<T>, AppError> + Send + Sync + 'static,
    {
        self.find_all_fn = Some(Box::new(f));
        self
    }

    /// Payloads passed to `create`, as they were before the handler ran.
    pub fn create_calls(&self) -> Vec<T> {
        self.calls.read().unwrap().create.clone()
    }

    pub fn update_calls(&self) -> Vec<T> {
        self.calls.read().unwrap().update.clone()
    }

    pub fn delete_calls(&self) -> Vec<T> {
        self.calls.read().unwrap().delete.clone()
    }

    pub fn find_calls(&self) -> Vec<T> {
        self.calls.read().unwrap().find.clone()
    }

    /// Number of `find_all` calls; the method takes no payload.
    pub fn find_all_calls(&self) -> usize {
        self.calls.read().unwrap().find_all
    }

    fn record(&self, f: impl FnOnce(&mut CallLog<T>)) {
        f(&mut self.calls.write().unwrap());
    }
}

impl<T: Entity> Default for MockService<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn unconfigured(method: &str) -> ! {
    panic!("MockService::{method}: no handler configured but Service::{method} was just called")
}

#[async_trait]
impl<T: Entity> Service<T> for MockService<T> {
    async fn create(&self, entity: &mut T) -> Result<(), AppError> {
        let Some(handler) = self.create_fn.as_ref() else {
            unconfigured("create")
        };
        self.record(|log| log.create.push(entity.clone()));
        handler(entity)
    }

    async fn update(&self, entity: &T) -> Result<T, AppError> {
        let Some(handler) = self.update_fn.as_ref() else {
            unconfigured("update")
        };
        self.record(|log| log.update.push(entity.clone()));
        handler(entity)
    }

    async fn delete(&self, entity: &T) -> Result<(), AppError> {
        let Some(handler) = self.delete_fn.as_ref() else {
            unconfigured("delete")
        };
        self.record(|log| log.delete.push(entity.clone()));
        handler(entity)
    }

    async fn find(&self, entity: &T) -> Result<T, AppError> {
        let Some(handler) = self.find_fn.as_ref() else {
            unconfigured("find")
        };
        self.record(|log| log.find.push(entity.clone()));
        handler(entity)
    }

    async fn find_all(&self) -> Result<Vec<T>, AppError> {
        let Some(handler) = self.find_all_fn.as_ref() else {
            unconfigured("find_all")
        };
        self.record(|log| log.find_all += 1);
        handler()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Book, DatabaseError, User};
    use std::sync::Arc;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_calls_are_recorded_in_order() {
        let mock = MockService::<User>::new().with_find(|user| Ok(user.clone()));

        let first = User::new("Ada", "ada@example.com");
        let second = User::new("Grace", "grace@example.com");
        mock.find(&first).await.unwrap();
        mock.find(&second).await.unwrap();

        assert_eq!(mock.find_calls(), vec![first, second]);
        assert!(mock.create_calls().is_empty());
        assert_eq!(mock.find_all_calls(), 0);
    }

    #[tokio::test]
    async fn test_handler_result_is_returned() {
        let mock = MockService::<Book>::new()
            .with_update(|_| Err(DatabaseError::NotFound("book".to_string()).into()));

        let err = mock.update(&Book::default()).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(mock.update_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_create_records_payload_before_handler_mutates_it() {
        let id = Uuid::new_v4();
        let mock = MockService::<User>::new().with_create(move |user| {
            user.model.id = id;
            Ok(())
        });

        let mut user = User::new("Ada", "ada@example.com");
        mock.create(&mut user).await.unwrap();

        assert_eq!(user.id(), id);
        assert!(mock.create_calls()[0].model.is_new());
    }

    #[tokio::test]
    async fn test_concurrent_calls_are_all_recorded() {
        let mock = Arc::new(MockService::<User>::new().with_delete(|_| Ok(())));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let mock = Arc::clone(&mock);
                tokio::spawn(async move { mock.delete(&User::default()).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(mock.delete_calls().len(), 8);
    }

    #[test]
    #[should_panic(expected = "MockService::create")]
    fn test_unconfigured_method_panics() {
        let mock = MockService::<User>::new();
        let mut user = User::default();
        let _ = tokio_test::block_on(mock.create(&mut user));
    }

    #[test]
    #[should_panic(expected = "MockService::find_all")]
    fn test_unconfigured_find_all_panics() {
        let mock = MockService::<User>::new().with_find(|user| Ok(user.clone()));
        let _ = tokio_test::block_on(mock.find_all());
    }
}
