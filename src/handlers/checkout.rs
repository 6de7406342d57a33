// Public checkout: anonymous storefront carts post product ids here, we
// persist an unpaid order and hand back the payment provider's hosted
// session URL. No ownership check on this route by design.

use axum::{
    extract::{rejection::JsonRejection, Path},
    Json,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::order::Order;
use crate::database::models::product::Product;
use crate::error::ApiError;
use crate::services::payment::{LineItem, PaymentClient};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub product_ids: Option<Vec<Value>>,
}

/// POST /api/:store_id/checkout
pub async fn create(
    Path(store_id): Path<Uuid>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload.map_err(|_| ApiError::required("Product ids"))?;
    let product_ids = parse_product_ids(body.product_ids)?;
    if product_ids.is_empty() {
        // Well-typed ids that parse to nothing can match no products
        return Err(ApiError::not_found("No products found"));
    }

    let pool = DatabaseManager::pool().await?;
    let products = Product::find_by_ids(&pool, &product_ids)
        .await
        .map_err(|e| ApiError::internal("CHECKOUT_POST", e))?;

    if products.is_empty() {
        return Err(ApiError::not_found("No products found"));
    }

    let matched_ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
    let order = Order::create_with_items(&pool, store_id, &matched_ids)
        .await
        .map_err(|e| ApiError::internal("CHECKOUT_POST", e))?;

    let line_items = products
        .iter()
        .map(|product| {
            let unit_amount = (product.price * Decimal::from(100))
                .trunc()
                .to_i64()
                .ok_or_else(|| ApiError::internal("CHECKOUT_POST", "price out of range"))?;
            Ok(LineItem {
                name: product.name.clone(),
                unit_amount,
                quantity: 1,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    let client = PaymentClient::from_config()
        .map_err(|e| ApiError::internal("CHECKOUT_POST", e))?;
    let session = client
        .create_checkout_session(&line_items, order.id)
        .await
        .map_err(|e| ApiError::internal("CHECKOUT_POST", e))?;

    Ok(Json(json!({ "url": session.url })))
}

/// Validate the submitted id list: it must be present, non-empty, and all
/// strings. Entries that are well-typed but not real ids simply match no
/// products, which the caller surfaces as 404.
fn parse_product_ids(raw: Option<Vec<Value>>) -> Result<Vec<Uuid>, ApiError> {
    let raw = raw.unwrap_or_default();
    if raw.is_empty() {
        return Err(ApiError::required("Product ids"));
    }

    let mut ids = Vec::with_capacity(raw.len());
    for value in &raw {
        let Some(s) = value.as_str() else {
            return Err(ApiError::bad_request("Invalid product IDs format"));
        };
        if let Ok(id) = Uuid::parse_str(s) {
            ids.push(id);
        }
    }

    Ok(ids)
}
