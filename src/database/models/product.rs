use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::category::Category;
use crate::database::models::color::Color;
use crate::database::models::size::Size;
use crate::database::repository::text_present;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub store_id: Uuid,
    pub category_id: Uuid,
    pub size_id: Uuid,
    pub color_id: Uuid,
    pub name: String,
    pub supplier: Option<String>,
    pub price: Decimal,
    pub quantity: i32,
    pub is_featured: bool,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: Uuid,
    pub product_id: Uuid,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product with its relations embedded, the shape the storefront consumes
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<ProductImage>,
    pub category: Category,
    pub size: Size,
    pub color: Color,
}

#[derive(Debug, Deserialize)]
pub struct ImageInput {
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: Option<String>,
    pub supplier: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
    pub category_id: Option<Uuid>,
    pub size_id: Option<Uuid>,
    pub color_id: Option<Uuid>,
    pub images: Option<Vec<ImageInput>>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_archived: bool,
}

impl ProductInput {
    /// Required-field checks in the fixed order the dashboard relies on
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.price.is_none() {
            return Err(ApiError::required("Price"));
        }
        if self.quantity.is_none() {
            return Err(ApiError::required("Quantity"));
        }
        if !text_present(&self.name) {
            return Err(ApiError::required("Name"));
        }
        if self.category_id.is_none() {
            return Err(ApiError::required("Category id"));
        }
        if self.images.as_ref().map_or(true, |imgs| imgs.is_empty()) {
            return Err(ApiError::required("Images"));
        }
        if self.size_id.is_none() {
            return Err(ApiError::required("Size id"));
        }
        if self.color_id.is_none() {
            return Err(ApiError::required("Color id"));
        }
        Ok(())
    }
}

/// Query-string filters accepted by the public product listing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub category_id: Option<Uuid>,
    pub size_id: Option<Uuid>,
    pub color_id: Option<Uuid>,
    pub is_featured: Option<bool>,
}

impl Product {
    /// Insert the product row and its images in one transaction. The image
    /// collection never exists half-written.
    pub async fn insert(
        pool: &PgPool,
        store_id: Uuid,
        input: ProductInput,
    ) -> Result<Product, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let product = sqlx::query_as::<_, Product>(
            "INSERT INTO products \
             (store_id, category_id, size_id, color_id, name, supplier, price, quantity, is_featured, is_archived) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(store_id)
        .bind(input.category_id)
        .bind(input.size_id)
        .bind(input.color_id)
        .bind(&input.name)
        .bind(&input.supplier)
        .bind(input.price)
        .bind(input.quantity)
        .bind(input.is_featured)
        .bind(input.is_archived)
        .fetch_one(&mut *tx)
        .await?;

        for image in input.images.unwrap_or_default() {
            sqlx::query("INSERT INTO product_images (product_id, url) VALUES ($1, $2)")
                .bind(product.id)
                .bind(&image.url)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(product)
    }

    /// Update the row and replace its image collection atomically
    pub async fn update(
        pool: &PgPool,
        store_id: Uuid,
        id: Uuid,
        input: ProductInput,
    ) -> Result<Option<Product>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let product = sqlx::query_as::<_, Product>(
            "UPDATE products SET category_id = $1, size_id = $2, color_id = $3, \
             name = $4, supplier = $5, price = $6, quantity = $7, \
             is_featured = $8, is_archived = $9, updated_at = now() \
             WHERE id = $10 AND store_id = $11 RETURNING *",
        )
        .bind(input.category_id)
        .bind(input.size_id)
        .bind(input.color_id)
        .bind(&input.name)
        .bind(&input.supplier)
        .bind(input.price)
        .bind(input.quantity)
        .bind(input.is_featured)
        .bind(input.is_archived)
        .bind(id)
        .bind(store_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(product) = product else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("DELETE FROM product_images WHERE product_id = $1")
            .bind(product.id)
            .execute(&mut *tx)
            .await?;

        for image in input.images.unwrap_or_default() {
            sqlx::query("INSERT INTO product_images (product_id, url) VALUES ($1, $2)")
                .bind(product.id)
                .bind(&image.url)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(Some(product))
    }

    pub async fn delete(
        pool: &PgPool,
        store_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            "DELETE FROM products WHERE id = $1 AND store_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(store_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Product>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Single product with images and relations embedded
    pub async fn find_detail(pool: &PgPool, id: Uuid) -> Result<Option<ProductDetail>, sqlx::Error> {
        let Some(product) = Self::find(pool, id).await? else {
            return Ok(None);
        };

        let mut details = attach_relations(pool, vec![product]).await?;
        Ok(details.pop())
    }

    /// Store-scoped listing for the storefront: filterable, archived
    /// products excluded, newest first, relations embedded.
    pub async fn list_detail(
        pool: &PgPool,
        store_id: Uuid,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductDetail>, sqlx::Error> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products \
             WHERE store_id = $1 AND is_archived = FALSE \
             AND ($2::uuid IS NULL OR category_id = $2) \
             AND ($3::uuid IS NULL OR size_id = $3) \
             AND ($4::uuid IS NULL OR color_id = $4) \
             AND ($5::bool IS NULL OR is_featured = $5) \
             ORDER BY created_at DESC",
        )
        .bind(store_id)
        .bind(filter.category_id)
        .bind(filter.size_id)
        .bind(filter.color_id)
        .bind(filter.is_featured)
        .fetch_all(pool)
        .await?;

        attach_relations(pool, products).await
    }

    /// Storefront purchase path: return the product with relations and
    /// knock one unit off its quantity.
    pub async fn purchase(pool: &PgPool, id: Uuid) -> Result<Option<ProductDetail>, sqlx::Error> {
        let Some(detail) = Self::find_detail(pool, id).await? else {
            return Ok(None);
        };

        sqlx::query("UPDATE products SET quantity = quantity - 1, updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(Some(detail))
    }
}

pub async fn images_for(pool: &PgPool, product_ids: &[Uuid]) -> Result<Vec<ProductImage>, sqlx::Error> {
    if product_ids.is_empty() {
        return Ok(vec![]);
    }
    sqlx::query_as::<_, ProductImage>(
        "SELECT * FROM product_images WHERE product_id = ANY($1) ORDER BY created_at",
    )
    .bind(product_ids)
    .fetch_all(pool)
    .await
}

/// Batch-load images, categories, sizes and colors for a page of products
async fn attach_relations(
    pool: &PgPool,
    products: Vec<Product>,
) -> Result<Vec<ProductDetail>, sqlx::Error> {
    if products.is_empty() {
        return Ok(vec![]);
    }

    let product_ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
    let category_ids: Vec<Uuid> = products.iter().map(|p| p.category_id).collect();
    let size_ids: Vec<Uuid> = products.iter().map(|p| p.size_id).collect();
    let color_ids: Vec<Uuid> = products.iter().map(|p| p.color_id).collect();

    let mut images: HashMap<Uuid, Vec<ProductImage>> = HashMap::new();
    for image in images_for(pool, &product_ids).await? {
        images.entry(image.product_id).or_default().push(image);
    }

    let categories: HashMap<Uuid, Category> =
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ANY($1)")
            .bind(&category_ids)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

    let sizes: HashMap<Uuid, Size> =
        sqlx::query_as::<_, Size>("SELECT * FROM sizes WHERE id = ANY($1)")
            .bind(&size_ids)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

    let colors: HashMap<Uuid, Color> =
        sqlx::query_as::<_, Color>("SELECT * FROM colors WHERE id = ANY($1)")
            .bind(&color_ids)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

    let mut details = Vec::with_capacity(products.len());
    for product in products {
        // Relations are NOT NULL foreign keys, so a miss here means the
        // database changed under us mid-request; skip rather than panic.
        let (Some(category), Some(size), Some(color)) = (
            categories.get(&product.category_id).cloned(),
            sizes.get(&product.size_id).cloned(),
            colors.get(&product.color_id).cloned(),
        ) else {
            tracing::warn!("Product {} lost a relation during read", product.id);
            continue;
        };

        details.push(ProductDetail {
            images: images.remove(&product.id).unwrap_or_default(),
            category,
            size,
            color,
            product,
        });
    }

    Ok(details)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_input() -> ProductInput {
        ProductInput {
            name: Some("Trail Shirt".to_string()),
            supplier: Some("Acme".to_string()),
            price: Some(Decimal::new(4999, 2)),
            quantity: Some(10),
            category_id: Some(Uuid::new_v4()),
            size_id: Some(Uuid::new_v4()),
            color_id: Some(Uuid::new_v4()),
            images: Some(vec![ImageInput { url: "https://img.example/1.png".to_string() }]),
            is_featured: false,
            is_archived: false,
        }
    }

    #[test]
    fn test_validation_order_is_fixed() {
        // Every field missing: price is checked first
        let empty = ProductInput {
            name: None,
            supplier: None,
            price: None,
            quantity: None,
            category_id: None,
            size_id: None,
            color_id: None,
            images: None,
            is_featured: false,
            is_archived: false,
        };
        assert_eq!(empty.validate().unwrap_err().message(), "Price is required");

        let mut input = full_input();
        input.quantity = None;
        assert_eq!(input.validate().unwrap_err().message(), "Quantity is required");

        let mut input = full_input();
        input.name = None;
        assert_eq!(input.validate().unwrap_err().message(), "Name is required");

        let mut input = full_input();
        input.category_id = None;
        assert_eq!(input.validate().unwrap_err().message(), "Category id is required");

        let mut input = full_input();
        input.images = Some(vec![]);
        assert_eq!(input.validate().unwrap_err().message(), "Images is required");

        let mut input = full_input();
        input.size_id = None;
        assert_eq!(input.validate().unwrap_err().message(), "Size id is required");

        let mut input = full_input();
        input.color_id = None;
        assert_eq!(input.validate().unwrap_err().message(), "Color id is required");

        assert!(full_input().validate().is_ok());
    }

    #[test]
    fn test_supplier_is_optional() {
        let mut input = full_input();
        input.supplier = None;
        assert!(input.validate().is_ok());
    }
}
