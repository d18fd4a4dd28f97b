//! Print-shop management API library.
//!
//! Order intake, inventory-aware line items over an append-only material
//! ledger, daily cash reports, and order file approval.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod seed;
pub mod services;

use axum::{extract::DefaultBodyLimit, middleware, routing::get, Json, Router};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Shared application state: the connection pool, the loaded configuration
/// and the service layer.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services =
            handlers::AppServices::new(db.clone(), std::path::PathBuf::from(&config.uploads_dir));
        Self {
            db,
            config,
            services,
        }
    }
}

/// All `/api` routes, composed from the per-resource handler modules.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth::routes())
        .merge(handlers::users::routes())
        .merge(handlers::orders::routes())
        .merge(handlers::files::routes())
        .merge(handlers::materials::routes())
        .merge(handlers::presets::routes())
        .merge(handlers::daily_reports::routes())
        .merge(handlers::printers::routes())
        .merge(handlers::reports::routes())
        .merge(handlers::calculators::routes())
}

/// The full application router: API, static upload serving, health and
/// the OpenAPI document, with token auth applied across the board (the
/// allowlist in `auth` keeps the public widget endpoints open).
pub fn app_router(state: AppState) -> Router {
    let uploads_dir = state.config.uploads_dir.clone();
    let max_body = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(|| async { "printshop-api up" }))
        .route("/health", get(health_check))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .nest("/api", api_routes())
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<Value> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    Json(json!({
        "status": db_status,
        "checks": { "database": db_status },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
