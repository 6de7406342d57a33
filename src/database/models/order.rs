// Orders are normally minted by the public checkout flow, unpaid, with one
// item per purchased product. The admin surface can amend contact details
// or mark them paid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::product::Product;
use crate::database::repository::text_present;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub store_id: Uuid,
    pub phone: String,
    pub address: String,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDetail {
    #[serde(flatten)]
    pub item: OrderItem,
    pub product: Option<Product>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub order_items: Vec<OrderItemDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub is_paid: bool,
}

impl OrderInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !text_present(&self.phone) {
            return Err(ApiError::required("Phone"));
        }
        if !text_present(&self.address) {
            return Err(ApiError::required("Address"));
        }
        Ok(())
    }
}

impl Order {
    /// Create an unpaid order with one item per product, atomically
    pub async fn create_with_items(
        pool: &PgPool,
        store_id: Uuid,
        product_ids: &[Uuid],
    ) -> Result<Order, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(
            "INSERT INTO orders (store_id, is_paid) VALUES ($1, FALSE) RETURNING *",
        )
        .bind(store_id)
        .fetch_one(&mut *tx)
        .await?;

        for product_id in product_ids {
            sqlx::query("INSERT INTO order_items (order_id, product_id) VALUES ($1, $2)")
                .bind(order.id)
                .bind(product_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(order)
    }

    pub async fn insert(
        pool: &PgPool,
        store_id: Uuid,
        input: OrderInput,
    ) -> Result<Order, sqlx::Error> {
        sqlx::query_as::<_, Order>(
            "INSERT INTO orders (store_id, phone, address, is_paid) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(store_id)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(input.is_paid)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        store_id: Uuid,
        id: Uuid,
        input: OrderInput,
    ) -> Result<Option<Order>, sqlx::Error> {
        sqlx::query_as::<_, Order>(
            "UPDATE orders SET phone = $1, address = $2, is_paid = $3, updated_at = now() \
             WHERE id = $4 AND store_id = $5 RETURNING *",
        )
        .bind(&input.phone)
        .bind(&input.address)
        .bind(input.is_paid)
        .bind(id)
        .bind(store_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(
        pool: &PgPool,
        store_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Order>, sqlx::Error> {
        sqlx::query_as::<_, Order>(
            "DELETE FROM orders WHERE id = $1 AND store_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(store_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_detail(pool: &PgPool, id: Uuid) -> Result<Option<OrderDetail>, sqlx::Error> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let mut details = attach_items(pool, vec![order]).await?;
        Ok(details.pop())
    }

    pub async fn list_detail(pool: &PgPool, store_id: Uuid) -> Result<Vec<OrderDetail>, sqlx::Error> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE store_id = $1 ORDER BY created_at DESC",
        )
        .bind(store_id)
        .fetch_all(pool)
        .await?;

        attach_items(pool, orders).await
    }
}

async fn attach_items(pool: &PgPool, orders: Vec<Order>) -> Result<Vec<OrderDetail>, sqlx::Error> {
    if orders.is_empty() {
        return Ok(vec![]);
    }

    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT * FROM order_items WHERE order_id = ANY($1)",
    )
    .bind(&order_ids)
    .fetch_all(pool)
    .await?;

    let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
    let products: HashMap<Uuid, Product> = Product::find_by_ids(pool, &product_ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let mut by_order: HashMap<Uuid, Vec<OrderItemDetail>> = HashMap::new();
    for item in items {
        let product = products.get(&item.product_id).cloned();
        by_order
            .entry(item.order_id)
            .or_default()
            .push(OrderItemDetail { item, product });
    }

    Ok(orders
        .into_iter()
        .map(|order| OrderDetail {
            order_items: by_order.remove(&order.id).unwrap_or_default(),
            order,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_order_phone_first() {
        let input = OrderInput { phone: None, address: None, is_paid: false };
        assert_eq!(input.validate().unwrap_err().message(), "Phone is required");

        let input = OrderInput {
            phone: Some("555-0100".to_string()),
            address: None,
            is_paid: false,
        };
        assert_eq!(input.validate().unwrap_err().message(), "Address is required");

        let input = OrderInput {
            phone: Some("555-0100".to_string()),
            address: Some("1 Main St".to_string()),
            is_paid: true,
        };
        assert!(input.validate().is_ok());
    }
}
