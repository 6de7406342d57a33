// Order handlers. Reads embed the order's items and their products for the
// dashboard table; mutation follows the standard pipeline.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    Json,
};
use uuid::Uuid;

use crate::auth::guard;
use crate::database::manager::DatabaseManager;
use crate::database::models::order::{Order, OrderDetail, OrderInput};
use crate::error::ApiError;
use crate::middleware::identity::Identity;

/// GET /api/:store_id/orders
pub async fn list(Path(store_id): Path<Uuid>) -> Result<Json<Vec<OrderDetail>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let orders = Order::list_detail(&pool, store_id)
        .await
        .map_err(|e| ApiError::internal("ORDERS_GET", e))?;
    Ok(Json(orders))
}

/// GET /api/:store_id/orders/:id
pub async fn find(
    Path((_store_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Option<OrderDetail>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let order = Order::find_detail(&pool, id)
        .await
        .map_err(|e| ApiError::internal("ORDER_GET", e))?;
    Ok(Json(order))
}

/// POST /api/:store_id/orders - manual order entry from the dashboard
pub async fn create(
    Extension(identity): Extension<Identity>,
    Path(store_id): Path<Uuid>,
    payload: Result<Json<OrderInput>, JsonRejection>,
) -> Result<Json<Order>, ApiError> {
    identity.require()?;
    let Json(input) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    input.validate()?;
    guard::authorize(&identity, store_id).await?;

    let pool = DatabaseManager::pool().await?;
    let order = Order::insert(&pool, store_id, input)
        .await
        .map_err(|e| ApiError::internal("ORDERS_POST", e))?;
    Ok(Json(order))
}

/// PATCH /api/:store_id/orders/:id - amend contact details or mark paid
pub async fn update(
    Extension(identity): Extension<Identity>,
    Path((store_id, id)): Path<(Uuid, Uuid)>,
    payload: Result<Json<OrderInput>, JsonRejection>,
) -> Result<Json<Order>, ApiError> {
    identity.require()?;
    let Json(input) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    input.validate()?;
    guard::authorize(&identity, store_id).await?;

    let pool = DatabaseManager::pool().await?;
    let order = Order::update(&pool, store_id, id, input)
        .await
        .map_err(|e| ApiError::internal("ORDER_PATCH", e))?;

    order.map(Json).ok_or_else(|| ApiError::bad_request("Order not found"))
}

/// DELETE /api/:store_id/orders/:id
pub async fn remove(
    Extension(identity): Extension<Identity>,
    Path((store_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Order>, ApiError> {
    identity.require()?;
    guard::authorize(&identity, store_id).await?;

    let pool = DatabaseManager::pool().await?;
    let order = Order::delete(&pool, store_id, id)
        .await
        .map_err(|e| ApiError::internal("ORDER_DELETE", e))?;

    order.map(Json).ok_or_else(|| ApiError::bad_request("Order not found"))
}
