// Required fields are checked in a fixed order and the first missing one
// names the 400. These run with a real token: validation happens after the
// identity check and before the ownership query, so no database is needed.

mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

const STORE_ID: &str = "7f3b38ab-9f6c-4b2a-91a4-d0736ed77d9a";

async fn expect_400(
    client: &reqwest::Client,
    token: &str,
    url: &str,
    body: Value,
    message: &str,
) -> Result<()> {
    let res = client.post(url).bearer_auth(token).json(&body).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST, "POST {} {}", url, body);
    assert_eq!(res.text().await?, message, "POST {} {}", url, body);
    Ok(())
}

#[tokio::test]
async fn billboard_fields_in_order() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::auth_token("user_validation")?;
    let url = format!("{}/api/{}/billboards", server.base_url, STORE_ID);

    expect_400(&client, &token, &url, json!({}), "Label is required").await?;
    expect_400(
        &client,
        &token,
        &url,
        json!({ "label": "Summer sale" }),
        "Image URL is required",
    )
    .await?;
    expect_400(
        &client,
        &token,
        &url,
        json!({ "label": "", "imageUrl": "https://img.example/1.png" }),
        "Label is required",
    )
    .await?;

    Ok(())
}

#[tokio::test]
async fn category_fields_in_order() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::auth_token("user_validation")?;
    let url = format!("{}/api/{}/categories", server.base_url, STORE_ID);

    expect_400(&client, &token, &url, json!({}), "Name is required").await?;
    expect_400(
        &client,
        &token,
        &url,
        json!({ "name": "Shirts" }),
        "Billboard id is required",
    )
    .await?;

    Ok(())
}

#[tokio::test]
async fn size_and_color_fields_in_order() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::auth_token("user_validation")?;

    for entity in ["sizes", "colors"] {
        let url = format!("{}/api/{}/{}", server.base_url, STORE_ID, entity);
        expect_400(&client, &token, &url, json!({}), "Name is required").await?;
        expect_400(&client, &token, &url, json!({ "name": "Large" }), "Value is required").await?;
    }

    Ok(())
}

#[tokio::test]
async fn product_fields_in_order() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::auth_token("user_validation")?;
    let url = format!("{}/api/{}/products", server.base_url, STORE_ID);

    let category = "0185d9b4-7e3e-4f9e-b1b2-5b0c8f0e0001";
    let size = "0185d9b4-7e3e-4f9e-b1b2-5b0c8f0e0002";

    expect_400(&client, &token, &url, json!({}), "Price is required").await?;
    expect_400(&client, &token, &url, json!({ "price": "19.99" }), "Quantity is required").await?;
    expect_400(
        &client,
        &token,
        &url,
        json!({ "price": "19.99", "quantity": 3 }),
        "Name is required",
    )
    .await?;
    expect_400(
        &client,
        &token,
        &url,
        json!({ "price": "19.99", "quantity": 3, "name": "Shirt" }),
        "Category id is required",
    )
    .await?;
    expect_400(
        &client,
        &token,
        &url,
        json!({ "price": "19.99", "quantity": 3, "name": "Shirt", "categoryId": category }),
        "Images is required",
    )
    .await?;
    expect_400(
        &client,
        &token,
        &url,
        json!({
            "price": "19.99", "quantity": 3, "name": "Shirt",
            "categoryId": category, "images": [{ "url": "https://img.example/1.png" }]
        }),
        "Size id is required",
    )
    .await?;
    expect_400(
        &client,
        &token,
        &url,
        json!({
            "price": "19.99", "quantity": 3, "name": "Shirt",
            "categoryId": category, "images": [{ "url": "https://img.example/1.png" }],
            "sizeId": size
        }),
        "Color id is required",
    )
    .await?;

    Ok(())
}

#[tokio::test]
async fn store_and_order_fields() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::auth_token("user_validation")?;

    let url = format!("{}/api/stores", server.base_url);
    expect_400(&client, &token, &url, json!({}), "Name is required").await?;
    expect_400(&client, &token, &url, json!({ "name": "" }), "Name is required").await?;

    let url = format!("{}/api/{}/orders", server.base_url, STORE_ID);
    expect_400(&client, &token, &url, json!({}), "Phone is required").await?;
    expect_400(&client, &token, &url, json!({ "phone": "555-0100" }), "Address is required").await?;

    Ok(())
}
