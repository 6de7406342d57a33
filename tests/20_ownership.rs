// Every mutating route answers 401 before anything else when no caller
// identity is present - field validity and body shape never matter.

mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

const STORE_ID: &str = "7f3b38ab-9f6c-4b2a-91a4-d0736ed77d9a";
const RECORD_ID: &str = "2d1c2f55-3a51-4f7a-8a32-5f6f0fb2a111";

#[tokio::test]
async fn mutating_routes_require_identity() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let posts = [
        format!("{}/api/stores", server.base_url),
        format!("{}/api/{}/billboards", server.base_url, STORE_ID),
        format!("{}/api/{}/categories", server.base_url, STORE_ID),
        format!("{}/api/{}/sizes", server.base_url, STORE_ID),
        format!("{}/api/{}/colors", server.base_url, STORE_ID),
        format!("{}/api/{}/products", server.base_url, STORE_ID),
        format!("{}/api/{}/orders", server.base_url, STORE_ID),
    ];

    for url in &posts {
        let res = client.post(url).json(&json!({})).send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "POST {}", url);
        assert_eq!(res.text().await?, "Unauthenticated", "POST {}", url);
    }

    let patches = [
        format!("{}/api/stores/{}", server.base_url, STORE_ID),
        format!("{}/api/{}/billboards/{}", server.base_url, STORE_ID, RECORD_ID),
        format!("{}/api/{}/products/{}", server.base_url, STORE_ID, RECORD_ID),
        format!("{}/api/{}/orders/{}", server.base_url, STORE_ID, RECORD_ID),
    ];

    for url in &patches {
        let res = client.patch(url).json(&json!({})).send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "PATCH {}", url);

        let res = client.delete(url).send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "DELETE {}", url);
    }

    Ok(())
}

#[tokio::test]
async fn invalid_bearer_token_resolves_to_anonymous() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/{}/billboards", server.base_url, STORE_ID))
        .bearer_auth("definitely.not.valid")
        .json(&json!({ "label": "x", "imageUrl": "y" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.text().await?, "Unauthenticated");

    Ok(())
}

#[tokio::test]
async fn identity_is_checked_before_the_body() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // Malformed JSON without a token is still a 401, not a 400
    let res = client
        .post(format!("{}/api/{}/billboards", server.base_url, STORE_ID))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
