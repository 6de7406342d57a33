// Store handlers. Stores are the ownership root, so these differ from the
// generic entity pipeline: creation attaches the caller as owner, and
// mutation is scoped by (id, owner) instead of a parent store.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    Json,
};
use uuid::Uuid;

use crate::auth::guard;
use crate::database::manager::DatabaseManager;
use crate::database::models::store::{Store, StoreInput};
use crate::error::ApiError;
use crate::middleware::identity::Identity;

/// POST /api/stores
pub async fn create(
    Extension(identity): Extension<Identity>,
    payload: Result<Json<StoreInput>, JsonRejection>,
) -> Result<Json<Store>, ApiError> {
    let user = identity.require()?;
    let Json(input) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    input.validate()?;

    let pool = DatabaseManager::pool().await?;
    let store = Store::insert(&pool, &user.user_id, input)
        .await
        .map_err(|e| ApiError::internal("STORES_POST", e))?;
    Ok(Json(store))
}

/// GET /api/stores - the caller's own stores
pub async fn list(Extension(identity): Extension<Identity>) -> Result<Json<Vec<Store>>, ApiError> {
    let user = identity.require()?;

    let pool = DatabaseManager::pool().await?;
    let stores = Store::list_for_owner(&pool, &user.user_id)
        .await
        .map_err(|e| ApiError::internal("STORES_GET", e))?;
    Ok(Json(stores))
}

/// GET /api/stores/:store_id - public single read
pub async fn find(Path(store_id): Path<Uuid>) -> Result<Json<Option<Store>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let store = Store::find(&pool, store_id)
        .await
        .map_err(|e| ApiError::internal("STORE_GET", e))?;
    Ok(Json(store))
}

/// PATCH /api/stores/:store_id
pub async fn update(
    Extension(identity): Extension<Identity>,
    Path(store_id): Path<Uuid>,
    payload: Result<Json<StoreInput>, JsonRejection>,
) -> Result<Json<Store>, ApiError> {
    let user = identity.require()?;
    let Json(input) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    input.validate()?;
    guard::authorize(&identity, store_id).await?;

    let pool = DatabaseManager::pool().await?;
    let store = Store::update_for_owner(&pool, store_id, &user.user_id, input)
        .await
        .map_err(|e| ApiError::internal("STORE_PATCH", e))?;

    // The guard just passed, so a miss here means the store went away
    // under us; surface it as not owned
    store.map(Json).ok_or(ApiError::Unauthorized)
}

/// DELETE /api/stores/:store_id
///
/// Rejected while the store still owns products or categories. This is a
/// handler-level rule, not just the database's referential integrity: the
/// caller gets told what to clean up first.
pub async fn remove(
    Extension(identity): Extension<Identity>,
    Path(store_id): Path<Uuid>,
) -> Result<Json<Store>, ApiError> {
    let user = identity.require()?;
    guard::authorize(&identity, store_id).await?;

    let pool = DatabaseManager::pool().await?;
    let (products, categories) = Store::dependent_counts(&pool, store_id)
        .await
        .map_err(|e| ApiError::internal("STORE_DELETE", e))?;

    if products > 0 || categories > 0 {
        return Err(ApiError::conflict(
            "Make sure you removed all products and categories first",
        ));
    }

    let store = Store::delete_for_owner(&pool, store_id, &user.user_id)
        .await
        .map_err(|e| ApiError::internal("STORE_DELETE", e))?;

    store.map(Json).ok_or(ApiError::Unauthorized)
}
