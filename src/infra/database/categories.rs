//! Category persistence.

use async_trait::async_trait;
use tracing::{info, instrument};
use uuid::Uuid;

use super::postgres::{PgService, Table, not_found};
use crate::domain::{AppError, Category, Entity, Service};

impl Table for Category {
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static str = "id, created_at, updated_at, deleted_at, name";
}

#[async_trait]
impl Service<Category> for PgService<Category> {
    #[instrument(skip(self, category), fields(category_name = %category.name))]
    async fn create(&self, category: &mut Category) -> Result<(), AppError> {
        let created = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, name)
            VALUES ($1, $2)
            RETURNING id, created_at, updated_at, deleted_at, name
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&category.name)
        .fetch_one(&self.pool)
        .await?;

        info!(category_id = %created.id(), "Category created");
        *category = created;
        Ok(())
    }

    #[instrument(skip(self, category), fields(category_id = %category.id()))]
    async fn update(&self, category: &Category) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, created_at, updated_at, deleted_at, name
            "#,
        )
        .bind(category.id())
        .bind(&category.name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found::<Category>(category.id()))
    }

    #[instrument(skip(self, category), fields(category_id = %category.id()))]
    async fn delete(&self, category: &Category) -> Result<(), AppError> {
        self.soft_delete(category.id()).await
    }

    #[instrument(skip(self, category), fields(category_id = %category.id()))]
    async fn find(&self, category: &Category) -> Result<Category, AppError> {
        self.fetch_live(category.id()).await
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Category>, AppError> {
        self.fetch_all_live().await
    }
}
