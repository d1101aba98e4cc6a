//! Loan persistence.
//!
//! The `loans_book_id_fkey` and `loans_user_id_fkey` constraints reject
//! unknown ids and the `loans_live_refs` trigger rejects soft-deleted ones,
//! both surfacing as [`DatabaseError::ForeignKeyViolation`](crate::domain::DatabaseError).
//! An update that keeps its existing references is not re-checked.

use async_trait::async_trait;
use tracing::{info, instrument};
use uuid::Uuid;

use super::postgres::{PgService, Table, not_found};
use crate::domain::{AppError, Entity, Loan, Service};

impl Table for Loan {
    const TABLE: &'static str = "loans";
    const COLUMNS: &'static str = "id, created_at, updated_at, deleted_at, book_id, user_id, due_at";
}

#[async_trait]
impl Service<Loan> for PgService<Loan> {
    #[instrument(skip(self, loan), fields(book_id = %loan.book_id, user_id = %loan.user_id))]
    async fn create(&self, loan: &mut Loan) -> Result<(), AppError> {
        let created = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (id, book_id, user_id, due_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, created_at, updated_at, deleted_at, book_id, user_id, due_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(loan.book_id)
        .bind(loan.user_id)
        .bind(loan.due_at)
        .fetch_one(&self.pool)
        .await?;

        info!(loan_id = %created.id(), "Loan created");
        *loan = created;
        Ok(())
    }

    #[instrument(skip(self, loan), fields(loan_id = %loan.id()))]
    async fn update(&self, loan: &Loan) -> Result<Loan, AppError> {
        sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans
            SET book_id = $2, user_id = $3, due_at = $4, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, created_at, updated_at, deleted_at, book_id, user_id, due_at
            "#,
        )
        .bind(loan.id())
        .bind(loan.book_id)
        .bind(loan.user_id)
        .bind(loan.due_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found::<Loan>(loan.id()))
    }

    #[instrument(skip(self, loan), fields(loan_id = %loan.id()))]
    async fn delete(&self, loan: &Loan) -> Result<(), AppError> {
        self.soft_delete(loan.id()).await
    }

    #[instrument(skip(self, loan), fields(loan_id = %loan.id()))]
    async fn find(&self, loan: &Loan) -> Result<Loan, AppError> {
        self.fetch_live(loan.id()).await
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Loan>, AppError> {
        self.fetch_all_live().await
    }
}
