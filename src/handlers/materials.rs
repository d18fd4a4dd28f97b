use crate::{
    auth::{require_admin, AuthUser},
    entities::material,
    errors::ServiceError,
    services::materials::{
        ForecastResponse, MaterialUpsertRequest, MoveResponse, MovesQuery, SpendRequest, TopQuery,
        TopSpenderResponse,
    },
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/materials", get(list_materials).post(upsert_material))
        .route("/materials/moves", get(list_moves))
        .route("/materials/low-stock", get(low_stock))
        .route("/materials/report/top", get(top_spenders))
        .route("/materials/report/forecast", get(forecast))
        .route("/materials/spend", post(spend))
        .route("/materials/:id", delete(delete_material))
}

/// List materials with live stock
#[utoipa::path(
    get,
    path = "/api/materials",
    responses(
        (status = 200, description = "Materials ordered by name", body = Vec<material::Model>),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn list_materials(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<material::Model>>, ServiceError> {
    Ok(Json(state.services.materials.list().await?))
}

/// Create or update a material (admin); duplicate names conflict
#[utoipa::path(
    post,
    path = "/api/materials",
    request_body = MaterialUpsertRequest,
    responses(
        (status = 200, description = "Full material list after the change", body = Vec<material::Model>),
        (status = 403, description = "Admin role required", body = crate::errors::ErrorResponse),
        (status = 409, description = "A material with this name exists", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn upsert_material(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<MaterialUpsertRequest>,
) -> Result<Json<Vec<material::Model>>, ServiceError> {
    require_admin(&auth_user)?;
    Ok(Json(state.services.materials.upsert(request).await?))
}

pub async fn delete_material(
    State(state): State<AppState>,
    Path(material_id): Path<i32>,
    auth_user: AuthUser,
) -> Result<StatusCode, ServiceError> {
    require_admin(&auth_user)?;
    state.services.materials.delete(material_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Manual signed stock adjustment with a ledger entry (admin)
#[utoipa::path(
    post,
    path = "/api/materials/spend",
    request_body = SpendRequest,
    responses(
        (status = 200, description = "Material after the adjustment", body = material::Model),
        (status = 403, description = "Admin role required", body = crate::errors::ErrorResponse),
        (status = 404, description = "Material not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn spend(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<SpendRequest>,
) -> Result<Json<material::Model>, ServiceError> {
    require_admin(&auth_user)?;
    Ok(Json(
        state.services.materials.spend(request, auth_user.id).await?,
    ))
}

/// Ledger history filterable by material, order, user and date range
#[utoipa::path(
    get,
    path = "/api/materials/moves",
    responses(
        (status = 200, description = "Ledger rows, newest first", body = Vec<MoveResponse>),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn list_moves(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(query): Query<MovesQuery>,
) -> Result<Json<Vec<MoveResponse>>, ServiceError> {
    Ok(Json(state.services.materials.moves(query).await?))
}

pub async fn low_stock(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<material::Model>>, ServiceError> {
    Ok(Json(state.services.materials.low_stock().await?))
}

pub async fn top_spenders(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(query): Query<TopQuery>,
) -> Result<Json<Vec<TopSpenderResponse>>, ServiceError> {
    Ok(Json(state.services.materials.top_spenders(query).await?))
}

pub async fn forecast(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<ForecastResponse>>, ServiceError> {
    Ok(Json(state.services.materials.forecast().await?))
}
