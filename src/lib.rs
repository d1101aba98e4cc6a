//! Library Service
//!
//! A library-management backend: books, categories, users and loans stored
//! in PostgreSQL, each exposed through the same `Service` capability set and
//! composed with middleware.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               Application Layer              │
//! │   Validation and instrumentation decorators  │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │      Entities, Service trait, error types    │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │  PostgreSQL services, config, observability  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! A call travels validation → instrumentation → PostgreSQL. Validation
//! failures return before anything below is touched; every other result
//! comes back up unchanged.
//!
//! # Example
//!
//! ```ignore
//! use library_service::app::AppState;
//! use library_service::domain::{Loan, Service};
//! use library_service::infra::PostgresClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let db = PostgresClient::with_defaults(&database_url).await?;
//!     db.run_migrations().await?;
//!
//!     let state = AppState::from_postgres(&db);
//!     let mut loan = Loan::new(book_id, user_id);
//!     state.loans.create(&mut loan).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod domain;
pub mod infra;

// Test utilities are available in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
