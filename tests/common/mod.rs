#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use printshop_api::{
    auth::hash_password,
    config::AppConfig,
    db,
    entities::{material, material_move, product_material, user},
    AppState,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde_json::Value;
use tower::ServiceExt;

pub const ADMIN_PASSWORD: &str = "admin-secret";
pub const MANAGER_PASSWORD: &str = "manager-secret";

/// Test harness: the real router over a fresh SQLite database in a
/// temporary directory, with one admin and one manager account seeded.
pub struct TestApp {
    pub router: Router,
    pub db: Arc<DatabaseConnection>,
    pub admin_id: i32,
    pub admin_token: String,
    pub manager_id: i32,
    pub manager_token: String,
    _tmp: tempfile::TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create tempdir");
        let db_path = tmp.path().join("printshop_test.db");
        let uploads_dir = tmp.path().join("uploads");

        let cfg = AppConfig {
            database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            log_level: "warn".to_string(),
            log_json: false,
            auto_migrate: true,
            seed_on_start: false,
            uploads_dir: uploads_dir.to_string_lossy().into_owned(),
            max_upload_bytes: 1024 * 1024,
            cors_allowed_origins: None,
            db_max_connections: 1,
            db_min_connections: 1,
            db_connect_timeout_secs: 5,
            db_idle_timeout_secs: 60,
            db_acquire_timeout_secs: 5,
        };

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("connect to test database");
        db::run_migrations(&pool).await.expect("run migrations");
        let db_arc = Arc::new(pool);

        let admin = seed_user(
            &db_arc,
            "Admin",
            "admin@test.local",
            ADMIN_PASSWORD,
            "admin",
        )
        .await;
        let manager = seed_user(
            &db_arc,
            "Manager",
            "manager@test.local",
            MANAGER_PASSWORD,
            "manager",
        )
        .await;

        let state = AppState::new(db_arc.clone(), cfg);
        let router = printshop_api::app_router(state);

        Self {
            router,
            db: db_arc,
            admin_id: admin.id,
            admin_token: admin.api_token,
            manager_id: manager.id,
            manager_token: manager.api_token,
            _tmp: tmp,
        }
    }

    /// Fires one request at the router and returns status plus decoded
    /// JSON body (Null for empty bodies).
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router response");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, path, token, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request(Method::POST, path, token, Some(body)).await
    }

    pub async fn patch(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request(Method::PATCH, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, path, token, None).await
    }

    /// Inserts a material directly, bypassing the API.
    pub async fn seed_material(&self, name: &str, quantity: f64, min_quantity: Option<f64>) -> i32 {
        material::ActiveModel {
            name: Set(name.to_string()),
            unit: Set("sheet".to_string()),
            quantity: Set(quantity),
            min_quantity: Set(min_quantity),
            sheet_price_single: Set(None),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .expect("seed material")
        .id
    }

    /// Inserts a recipe row for a preset (category, description).
    pub async fn seed_recipe(
        &self,
        category: &str,
        description: &str,
        material_id: i32,
        qty_per_item: f64,
    ) {
        product_material::ActiveModel {
            preset_category: Set(category.to_string()),
            preset_description: Set(description.to_string()),
            material_id: Set(material_id),
            qty_per_item: Set(qty_per_item),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .expect("seed recipe");
    }

    pub async fn material_quantity(&self, material_id: i32) -> f64 {
        material::Entity::find_by_id(material_id)
            .one(&*self.db)
            .await
            .expect("query material")
            .expect("material exists")
            .quantity
    }

    pub async fn moves_for(&self, material_id: i32) -> Vec<material_move::Model> {
        material_move::Entity::find()
            .filter(material_move::Column::MaterialId.eq(material_id))
            .all(&*self.db)
            .await
            .expect("query moves")
    }

    pub async fn ledger_sum(&self, material_id: i32) -> f64 {
        self.moves_for(material_id)
            .await
            .iter()
            .map(|m| m.delta)
            .sum()
    }
}

async fn seed_user(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> user::Model {
    user::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        phone: Set(None),
        password_hash: Set(hash_password(password)),
        api_token: Set(format!("{}-token-0123456789abcdef", role)),
        role: Set(role.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed user")
}

pub fn today() -> String {
    chrono::Utc::now().date_naive().to_string()
}
