pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::database::models::billboard::Billboard;
use crate::database::models::category::Category;
use crate::database::models::color::Color;
use crate::database::models::size::Size;
use crate::handlers::{checkout, orders, products, resource, stores};

pub fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Stores (ownership root)
        .merge(store_routes())
        // Store-owned entities
        .merge(entity_routes())
        // Anonymous storefront checkout
        .merge(checkout_routes())
        // Global middleware
        .layer(axum::middleware::from_fn(middleware::identity::resolve_identity))
        .layer(TraceLayer::new_for_http())
}

fn store_routes() -> Router {
    Router::new()
        .route("/api/stores", get(stores::list).post(stores::create))
        .route(
            "/api/stores/:store_id",
            get(stores::find).patch(stores::update).delete(stores::remove),
        )
}

fn entity_routes() -> Router {
    Router::new()
        .route(
            "/api/:store_id/billboards",
            get(resource::list::<Billboard>).post(resource::create::<Billboard>),
        )
        .route(
            "/api/:store_id/billboards/:id",
            get(resource::find::<Billboard>)
                .patch(resource::update::<Billboard>)
                .delete(resource::remove::<Billboard>),
        )
        .route(
            "/api/:store_id/categories",
            get(resource::list::<Category>).post(resource::create::<Category>),
        )
        .route(
            "/api/:store_id/categories/:id",
            get(resource::find::<Category>)
                .patch(resource::update::<Category>)
                .delete(resource::remove::<Category>),
        )
        .route(
            "/api/:store_id/sizes",
            get(resource::list::<Size>).post(resource::create::<Size>),
        )
        .route(
            "/api/:store_id/sizes/:id",
            get(resource::find::<Size>)
                .patch(resource::update::<Size>)
                .delete(resource::remove::<Size>),
        )
        .route(
            "/api/:store_id/colors",
            get(resource::list::<Color>).post(resource::create::<Color>),
        )
        .route(
            "/api/:store_id/colors/:id",
            get(resource::find::<Color>)
                .patch(resource::update::<Color>)
                .delete(resource::remove::<Color>),
        )
        .route(
            "/api/:store_id/products",
            get(products::list).post(products::create),
        )
        .route(
            "/api/:store_id/products/:id",
            get(products::find)
                .post(products::purchase)
                .patch(products::update)
                .delete(products::remove),
        )
        .route("/api/:store_id/orders", get(orders::list).post(orders::create))
        .route(
            "/api/:store_id/orders/:id",
            get(orders::find).patch(orders::update).delete(orders::remove),
        )
}

fn checkout_routes() -> Router {
    Router::new()
        .route("/api/:store_id/checkout", post(checkout::create))
        .layer(checkout_cors())
}

/// CORS for the anonymous checkout route: only the configured storefront
/// origin may call it from a browser. Preflight is answered by the layer.
fn checkout_cors() -> CorsLayer {
    let origin = &config::config().checkout.storefront_origin;

    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    match origin.parse::<HeaderValue>() {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            tracing::warn!("Invalid storefront origin '{}'; checkout CORS not applied", origin);
            layer
        }
    }
}

pub async fn serve(port: u16) -> anyhow::Result<()> {
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    println!("🚀 Bazaar API server listening on http://{}", bind_addr);

    axum::serve(listener, app()).await?;
    Ok(())
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Bazaar API",
        "version": version,
        "description": "Multi-tenant e-commerce administration API built with Rust (Axum)",
        "endpoints": {
            "home": "/ (public)",
            "stores": "/api/stores[/:storeId] (mutations require a bearer token)",
            "billboards": "/api/:storeId/billboards[/:id]",
            "categories": "/api/:storeId/categories[/:id]",
            "sizes": "/api/:storeId/sizes[/:id]",
            "colors": "/api/:storeId/colors[/:id]",
            "products": "/api/:storeId/products[/:id]",
            "orders": "/api/:storeId/orders[/:id]",
            "checkout": "/api/:storeId/checkout (public)",
        },
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
