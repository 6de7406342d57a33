// Product handlers. Products carry an owned image collection and three
// same-store relations, so they bypass the generic pipeline: writes are
// transactional (row + images together) and reads embed relations.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    Json,
};
use uuid::Uuid;

use crate::auth::guard;
use crate::database::manager::{is_foreign_key_violation, DatabaseManager};
use crate::database::models::product::{Product, ProductDetail, ProductFilter, ProductInput};
use crate::error::ApiError;
use crate::middleware::identity::Identity;

/// GET /api/:store_id/products - public storefront listing; archived
/// products are never served, filters narrow by relation or featured flag
pub async fn list(
    Path(store_id): Path<Uuid>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<ProductDetail>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let products = Product::list_detail(&pool, store_id, &filter)
        .await
        .map_err(|e| ApiError::internal("PRODUCTS_GET", e))?;
    Ok(Json(products))
}

/// GET /api/:store_id/products/:id - public single read with relations
pub async fn find(
    Path((_store_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Option<ProductDetail>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let product = Product::find_detail(&pool, id)
        .await
        .map_err(|e| ApiError::internal("PRODUCT_GET", e))?;
    Ok(Json(product))
}

/// POST /api/:store_id/products/:id - storefront purchase path: returns
/// the product and decrements its quantity by one
pub async fn purchase(
    Path((_store_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ProductDetail>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let product = Product::purchase(&pool, id)
        .await
        .map_err(|e| ApiError::internal("PRODUCT_PURCHASE", e))?;

    product
        .map(Json)
        .ok_or_else(|| ApiError::bad_request("Product not found"))
}

/// POST /api/:store_id/products
pub async fn create(
    Extension(identity): Extension<Identity>,
    Path(store_id): Path<Uuid>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    identity.require()?;
    let Json(input) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    input.validate()?;
    guard::authorize(&identity, store_id).await?;

    let pool = DatabaseManager::pool().await?;
    let product = Product::insert(&pool, store_id, input)
        .await
        .map_err(|e| ApiError::internal("PRODUCTS_POST", e))?;
    Ok(Json(product))
}

/// PATCH /api/:store_id/products/:id
pub async fn update(
    Extension(identity): Extension<Identity>,
    Path((store_id, id)): Path<(Uuid, Uuid)>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    identity.require()?;
    let Json(input) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    input.validate()?;
    guard::authorize(&identity, store_id).await?;

    let pool = DatabaseManager::pool().await?;
    let product = Product::update(&pool, store_id, id, input)
        .await
        .map_err(|e| ApiError::internal("PRODUCT_PATCH", e))?;

    product
        .map(Json)
        .ok_or_else(|| ApiError::bad_request("Product not found"))
}

/// DELETE /api/:store_id/products/:id
pub async fn remove(
    Extension(identity): Extension<Identity>,
    Path((store_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Product>, ApiError> {
    identity.require()?;
    guard::authorize(&identity, store_id).await?;

    let pool = DatabaseManager::pool().await?;
    match Product::delete(&pool, store_id, id).await {
        Ok(Some(product)) => Ok(Json(product)),
        Ok(None) => Err(ApiError::bad_request("Product not found")),
        Err(e) if is_foreign_key_violation(&e) => Err(ApiError::conflict(
            "Make sure you removed all orders using this product first",
        )),
        Err(e) => Err(ApiError::internal("PRODUCT_DELETE", e)),
    }
}
