use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::repository::{text_present, StoreResource};
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    pub id: Uuid,
    pub store_id: Uuid,
    pub name: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SizeInput {
    pub name: Option<String>,
    pub value: Option<String>,
}

#[async_trait]
impl StoreResource for Size {
    type Input = SizeInput;

    const TAG: &'static str = "SIZES";

    fn validate(input: &Self::Input) -> Result<(), ApiError> {
        if !text_present(&input.name) {
            return Err(ApiError::required("Name"));
        }
        if !text_present(&input.value) {
            return Err(ApiError::required("Value"));
        }
        Ok(())
    }

    fn delete_conflict() -> &'static str {
        "Make sure you removed all products using this size first"
    }

    async fn insert(pool: &PgPool, store_id: Uuid, input: Self::Input) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Size>(
            "INSERT INTO sizes (store_id, name, value) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(store_id)
        .bind(&input.name)
        .bind(&input.value)
        .fetch_one(pool)
        .await
    }

    async fn update(
        pool: &PgPool,
        store_id: Uuid,
        id: Uuid,
        input: Self::Input,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Size>(
            "UPDATE sizes SET name = $1, value = $2, updated_at = now() \
             WHERE id = $3 AND store_id = $4 RETURNING *",
        )
        .bind(&input.name)
        .bind(&input.value)
        .bind(id)
        .bind(store_id)
        .fetch_optional(pool)
        .await
    }

    async fn delete(pool: &PgPool, store_id: Uuid, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Size>(
            "DELETE FROM sizes WHERE id = $1 AND store_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(store_id)
        .fetch_optional(pool)
        .await
    }

    async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Size>("SELECT * FROM sizes WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn list(pool: &PgPool, store_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Size>(
            "SELECT * FROM sizes WHERE store_id = $1 ORDER BY created_at DESC",
        )
        .bind(store_id)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_order() {
        let input = SizeInput { name: None, value: Some("XL".to_string()) };
        assert_eq!(Size::validate(&input).unwrap_err().message(), "Name is required");

        let input = SizeInput { name: Some("Extra Large".to_string()), value: None };
        assert_eq!(Size::validate(&input).unwrap_err().message(), "Value is required");
    }
}
