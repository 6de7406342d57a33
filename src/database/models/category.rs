use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::repository::{text_present, StoreResource};
use crate::error::ApiError;

/// Categories hang a name off a billboard in the same store. The billboard
/// reference is load-bearing: the storefront renders a category page under
/// its billboard image.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub store_id: Uuid,
    pub billboard_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: Option<String>,
    pub billboard_id: Option<Uuid>,
}

#[async_trait]
impl StoreResource for Category {
    type Input = CategoryInput;

    const TAG: &'static str = "CATEGORIES";

    fn validate(input: &Self::Input) -> Result<(), ApiError> {
        if !text_present(&input.name) {
            return Err(ApiError::required("Name"));
        }
        if input.billboard_id.is_none() {
            return Err(ApiError::required("Billboard id"));
        }
        Ok(())
    }

    fn delete_conflict() -> &'static str {
        "Make sure you removed all products using this category first"
    }

    async fn insert(pool: &PgPool, store_id: Uuid, input: Self::Input) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (store_id, billboard_id, name) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(store_id)
        .bind(input.billboard_id)
        .bind(&input.name)
        .fetch_one(pool)
        .await
    }

    async fn update(
        pool: &PgPool,
        store_id: Uuid,
        id: Uuid,
        input: Self::Input,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $1, billboard_id = $2, updated_at = now() \
             WHERE id = $3 AND store_id = $4 RETURNING *",
        )
        .bind(&input.name)
        .bind(input.billboard_id)
        .bind(id)
        .bind(store_id)
        .fetch_optional(pool)
        .await
    }

    async fn delete(pool: &PgPool, store_id: Uuid, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "DELETE FROM categories WHERE id = $1 AND store_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(store_id)
        .fetch_optional(pool)
        .await
    }

    async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn list(pool: &PgPool, store_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE store_id = $1 ORDER BY created_at DESC",
        )
        .bind(store_id)
        .fetch_all(pool)
        .await
    }
}
