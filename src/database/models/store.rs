// Stores are the tenant root: every other entity hangs off one, and every
// mutation is authorized against the store's owning user id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::repository::text_present;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct StoreInput {
    pub name: Option<String>,
}

impl StoreInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !text_present(&self.name) {
            return Err(ApiError::required("Name"));
        }
        Ok(())
    }
}

impl Store {
    /// The ownership-guard query: store by id AND owning user
    pub async fn find_for_owner(
        pool: &PgPool,
        id: Uuid,
        user_id: &str,
    ) -> Result<Option<Store>, sqlx::Error> {
        sqlx::query_as::<_, Store>("SELECT * FROM stores WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Store>, sqlx::Error> {
        sqlx::query_as::<_, Store>("SELECT * FROM stores WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_owner(pool: &PgPool, user_id: &str) -> Result<Vec<Store>, sqlx::Error> {
        sqlx::query_as::<_, Store>(
            "SELECT * FROM stores WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn insert(
        pool: &PgPool,
        user_id: &str,
        input: StoreInput,
    ) -> Result<Store, sqlx::Error> {
        sqlx::query_as::<_, Store>(
            "INSERT INTO stores (user_id, name) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(&input.name)
        .fetch_one(pool)
        .await
    }

    /// Update scoped by (id, owner); None means the caller does not own it
    pub async fn update_for_owner(
        pool: &PgPool,
        id: Uuid,
        user_id: &str,
        input: StoreInput,
    ) -> Result<Option<Store>, sqlx::Error> {
        sqlx::query_as::<_, Store>(
            "UPDATE stores SET name = $1, updated_at = now() \
             WHERE id = $2 AND user_id = $3 RETURNING *",
        )
        .bind(&input.name)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete_for_owner(
        pool: &PgPool,
        id: Uuid,
        user_id: &str,
    ) -> Result<Option<Store>, sqlx::Error> {
        sqlx::query_as::<_, Store>(
            "DELETE FROM stores WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Dependent products and categories still owned by this store.
    /// Store deletion is rejected at the handler level while either is
    /// non-zero, independent of the database's referential integrity.
    pub async fn dependent_counts(pool: &PgPool, id: Uuid) -> Result<(i64, i64), sqlx::Error> {
        let products: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM products WHERE store_id = $1")
                .bind(id)
                .fetch_one(pool)
                .await?;
        let categories: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM categories WHERE store_id = $1")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok((products.0, categories.0))
    }
}
