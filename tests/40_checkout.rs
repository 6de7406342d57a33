// The checkout route is public and validates the submitted id list before
// touching anything else.

mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

const STORE_ID: &str = "7f3b38ab-9f6c-4b2a-91a4-d0736ed77d9a";

#[tokio::test]
async fn empty_product_ids_are_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let url = format!("{}/api/{}/checkout", server.base_url, STORE_ID);

    let res = client.post(&url).json(&json!({})).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.text().await?, "Product ids are required");

    let res = client.post(&url).json(&json!({ "productIds": [] })).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.text().await?, "Product ids are required");

    Ok(())
}

#[tokio::test]
async fn non_string_product_ids_are_malformed() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let url = format!("{}/api/{}/checkout", server.base_url, STORE_ID);

    let res = client
        .post(&url)
        .json(&json!({ "productIds": [1, 2, 3] }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.text().await?, "Invalid product IDs format");

    Ok(())
}

#[tokio::test]
async fn unknown_product_ids_are_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let url = format!("{}/api/{}/checkout", server.base_url, STORE_ID);

    let res = client
        .post(&url)
        .json(&json!({ "productIds": ["no-such-product"] }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await?, "No products found");

    Ok(())
}
