// Generic CRUD handlers for store-owned entities. One implementation of
// the authenticate -> validate -> authorize -> persist pipeline serves
// every entity that implements StoreResource; routes instantiate these
// per entity (e.g. `get(resource::list::<Billboard>)`).

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    Json,
};
use uuid::Uuid;

use crate::auth::guard;
use crate::database::manager::{is_foreign_key_violation, DatabaseManager};
use crate::database::repository::StoreResource;
use crate::error::ApiError;
use crate::middleware::identity::Identity;

/// GET /api/:store_id/:entity - public store-scoped listing
pub async fn list<R: StoreResource>(Path(store_id): Path<Uuid>) -> Result<Json<Vec<R>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let records = R::list(&pool, store_id)
        .await
        .map_err(|e| ApiError::internal(&format!("{}_GET", R::TAG), e))?;
    Ok(Json(records))
}

/// GET /api/:store_id/:entity/:id - public single read; body is `null`
/// when nothing matches, mirroring the original surface
pub async fn find<R: StoreResource>(
    Path((_store_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Option<R>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let record = R::find(&pool, id)
        .await
        .map_err(|e| ApiError::internal(&format!("{}_GET", R::TAG), e))?;
    Ok(Json(record))
}

/// POST /api/:store_id/:entity
pub async fn create<R: StoreResource>(
    Extension(identity): Extension<Identity>,
    Path(store_id): Path<Uuid>,
    payload: Result<Json<R::Input>, JsonRejection>,
) -> Result<Json<R>, ApiError> {
    // Identity first: an unauthenticated request is a 401 even when the
    // body is missing or malformed
    identity.require()?;
    let Json(input) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    R::validate(&input)?;
    guard::authorize(&identity, store_id).await?;

    let pool = DatabaseManager::pool().await?;
    let record = R::insert(&pool, store_id, input)
        .await
        .map_err(|e| ApiError::internal(&format!("{}_POST", R::TAG), e))?;
    Ok(Json(record))
}

/// PATCH /api/:store_id/:entity/:id
pub async fn update<R: StoreResource>(
    Extension(identity): Extension<Identity>,
    Path((store_id, id)): Path<(Uuid, Uuid)>,
    payload: Result<Json<R::Input>, JsonRejection>,
) -> Result<Json<R>, ApiError> {
    identity.require()?;
    let Json(input) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    R::validate(&input)?;
    guard::authorize(&identity, store_id).await?;

    let pool = DatabaseManager::pool().await?;
    let record = R::update(&pool, store_id, id, input)
        .await
        .map_err(|e| ApiError::internal(&format!("{}_PATCH", R::TAG), e))?;

    record.map(Json).ok_or_else(|| ApiError::bad_request("Record not found"))
}

/// DELETE /api/:store_id/:entity/:id
pub async fn remove<R: StoreResource>(
    Extension(identity): Extension<Identity>,
    Path((store_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<R>, ApiError> {
    identity.require()?;
    guard::authorize(&identity, store_id).await?;

    let pool = DatabaseManager::pool().await?;
    match R::delete(&pool, store_id, id).await {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => Err(ApiError::bad_request("Record not found")),
        // Dependent rows still reference this record; tell the caller
        // what to remove instead of a generic failure
        Err(e) if is_foreign_key_violation(&e) => Err(ApiError::conflict(R::delete_conflict())),
        Err(e) => Err(ApiError::internal(&format!("{}_DELETE", R::TAG), e)),
    }
}
