use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

/// Descriptor for a store-owned entity served by the generic CRUD handlers.
///
/// Each simple entity (billboard, category, size, color) implements this
/// once: its required-field checks in their fixed order, its SQL, and its
/// delete-conflict wording. The handler layer then provides the uniform
/// authenticate -> validate -> authorize -> persist pipeline for all of
/// them. Entities with bespoke orchestration (stores, products, orders)
/// have their own handler modules instead.
#[async_trait]
pub trait StoreResource: Sized + Serialize + Send + 'static {
    /// Request body for create and update
    type Input: DeserializeOwned + Send + 'static;

    /// Log tag stem; handlers log failures as e.g. `[BILLBOARDS_POST]`
    const TAG: &'static str;

    /// Check required fields in the fixed order the clients rely on.
    /// The first failing check wins.
    fn validate(input: &Self::Input) -> Result<(), ApiError>;

    /// Message surfaced when dependent records block a delete
    fn delete_conflict() -> &'static str;

    async fn insert(pool: &PgPool, store_id: Uuid, input: Self::Input) -> Result<Self, sqlx::Error>;

    /// Update matched by id AND store scope; None when nothing matched
    async fn update(
        pool: &PgPool,
        store_id: Uuid,
        id: Uuid,
        input: Self::Input,
    ) -> Result<Option<Self>, sqlx::Error>;

    /// Delete matched by id AND store scope, returning the deleted row
    async fn delete(pool: &PgPool, store_id: Uuid, id: Uuid) -> Result<Option<Self>, sqlx::Error>;

    /// Public single-record read, unscoped by design
    async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error>;

    /// Public store-scoped listing, newest first
    async fn list(pool: &PgPool, store_id: Uuid) -> Result<Vec<Self>, sqlx::Error>;
}

/// Presence check shared by the validators: absent and empty both fail
pub fn text_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_present() {
        assert!(text_present(&Some("x".to_string())));
        assert!(!text_present(&Some(String::new())));
        assert!(!text_present(&Some("   ".to_string())));
        assert!(!text_present(&None));
    }
}
