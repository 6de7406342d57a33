use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::repository::{text_present, StoreResource};
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Billboard {
    pub id: Uuid,
    pub store_id: Uuid,
    pub label: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillboardInput {
    pub label: Option<String>,
    pub image_url: Option<String>,
}

#[async_trait]
impl StoreResource for Billboard {
    type Input = BillboardInput;

    const TAG: &'static str = "BILLBOARDS";

    fn validate(input: &Self::Input) -> Result<(), ApiError> {
        if !text_present(&input.label) {
            return Err(ApiError::required("Label"));
        }
        if !text_present(&input.image_url) {
            return Err(ApiError::required("Image URL"));
        }
        Ok(())
    }

    fn delete_conflict() -> &'static str {
        "Make sure you removed all categories using this billboard first"
    }

    async fn insert(pool: &PgPool, store_id: Uuid, input: Self::Input) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Billboard>(
            "INSERT INTO billboards (store_id, label, image_url) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(store_id)
        .bind(&input.label)
        .bind(&input.image_url)
        .fetch_one(pool)
        .await
    }

    async fn update(
        pool: &PgPool,
        store_id: Uuid,
        id: Uuid,
        input: Self::Input,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Billboard>(
            "UPDATE billboards SET label = $1, image_url = $2, updated_at = now() \
             WHERE id = $3 AND store_id = $4 RETURNING *",
        )
        .bind(&input.label)
        .bind(&input.image_url)
        .bind(id)
        .bind(store_id)
        .fetch_optional(pool)
        .await
    }

    async fn delete(pool: &PgPool, store_id: Uuid, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Billboard>(
            "DELETE FROM billboards WHERE id = $1 AND store_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(store_id)
        .fetch_optional(pool)
        .await
    }

    async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Billboard>("SELECT * FROM billboards WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn list(pool: &PgPool, store_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Billboard>(
            "SELECT * FROM billboards WHERE store_id = $1 ORDER BY created_at DESC",
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
    fn test_validation_order_label_first() {
        let input = BillboardInput { label: None, image_url: None };
        assert_eq!(
            Billboard::validate(&input).unwrap_err().message(),
            "Label is required"
        );

        let input = BillboardInput {
            label: Some("Summer".to_string()),
            image_url: None,
        };
        assert_eq!(
            Billboard::validate(&input).unwrap_err().message(),
            "Image URL is required"
        );

        let input = BillboardInput {
            label: Some("Summer".to_string()),
            image_url: Some("https://img.example/1.png".to_string()),
        };
        assert!(Billboard::validate(&input).is_ok());
    }
}
