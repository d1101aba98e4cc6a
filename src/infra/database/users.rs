//! User persistence. Live users have case-insensitively unique emails;
//! a clash surfaces as [`DatabaseError::Duplicate`](crate::domain::DatabaseError).

use async_trait::async_trait;
use tracing::{info, instrument};
use uuid::Uuid;

use super::postgres::{PgService, Table, not_found};
use crate::domain::{AppError, Entity, Service, User};

impl Table for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static str = "id, created_at, updated_at, deleted_at, name, email";
}

#[async_trait]
impl Service<User> for PgService<User> {
    #[instrument(skip(self, user))]
    async fn create(&self, user: &mut User) -> Result<(), AppError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email)
            VALUES ($1, $2, $3)
            RETURNING id, created_at, updated_at, deleted_at, name, email
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .fetch_one(&self.pool)
        .await?;

        info!(user_id = %created.id(), "User created");
        *user = created;
        Ok(())
    }

    #[instrument(skip(self, user), fields(user_id = %user.id()))]
    async fn update(&self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, email = $3, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, created_at, updated_at, deleted_at, name, email
            "#,
        )
        .bind(user.id())
        .bind(&user.name)
        .bind(&user.email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found::<User>(user.id()))
    }

    #[instrument(skip(self, user), fields(user_id = %user.id()))]
    async fn delete(&self, user: &User) -> Result<(), AppError> {
        self.soft_delete(user.id()).await
    }

    #[instrument(skip(self, user), fields(user_id = %user.id()))]
    async fn find(&self, user: &User) -> Result<User, AppError> {
        self.fetch_live(user.id()).await
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        self.fetch_all_live().await
    }
}
