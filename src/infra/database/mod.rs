//! Concrete database client implementations.
//!
//! This module contains the PostgreSQL adapters that implement the
//! `Service` trait defined in the domain layer, one per entity table.

mod books;
mod categories;
mod loans;
pub mod postgres;
mod users;

pub use postgres::{PgService, PostgresClient, PostgresConfig, Table};
