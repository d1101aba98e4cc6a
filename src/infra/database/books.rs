//! Book persistence.
//!
//! `category_id` must name a live category: the foreign key rejects unknown
//! ids and the `books_live_category` trigger rejects soft-deleted ones, both
//! surfacing as [`DatabaseError::ForeignKeyViolation`](crate::domain::DatabaseError).
//! The trigger only checks a category that is being assigned, so a book
//! whose category was deleted later can still be edited.

use async_trait::async_trait;
use tracing::{info, instrument};
use uuid::Uuid;

use super::postgres::{PgService, Table, not_found};
use crate::domain::{AppError, Book, Entity, Service};

impl Table for Book {
    const TABLE: &'static str = "books";
    const COLUMNS: &'static str =
        "id, created_at, updated_at, deleted_at, name, category_id, author, description";
}

#[async_trait]
impl Service<Book> for PgService<Book> {
    #[instrument(skip(self, book), fields(book_name = %book.name, category_id = %book.category_id))]
    async fn create(&self, book: &mut Book) -> Result<(), AppError> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (id, name, category_id, author, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, created_at, updated_at, deleted_at, name, category_id, author, description
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&book.name)
        .bind(book.category_id)
        .bind(&book.author)
        .bind(&book.description)
        .fetch_one(&self.pool)
        .await?;

        info!(book_id = %created.id(), "Book created");
        *book = created;
        Ok(())
    }

    #[instrument(skip(self, book), fields(book_id = %book.id()))]
    async fn update(&self, book: &Book) -> Result<Book, AppError> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET name = $2, category_id = $3, author = $4, description = $5, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, created_at, updated_at, deleted_at, name, category_id, author, description
            "#,
        )
        .bind(book.id())
        .bind(&book.name)
        .bind(book.category_id)
        .bind(&book.author)
        .bind(&book.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found::<Book>(book.id()))
    }

    #[instrument(skip(self, book), fields(book_id = %book.id()))]
    async fn delete(&self, book: &Book) -> Result<(), AppError> {
        self.soft_delete(book.id()).await
    }

    #[instrument(skip(self, book), fields(book_id = %book.id()))]
    async fn find(&self, book: &Book) -> Result<Book, AppError> {
        self.fetch_live(book.id()).await
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Book>, AppError> {
        self.fetch_all_live().await
    }
}
