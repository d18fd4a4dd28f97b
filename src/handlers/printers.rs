use crate::{
    auth::{require_admin, AuthUser},
    entities::{printer, printer_counter},
    errors::ServiceError,
    services::printers::{PrinterCounterView, SubmitCounterRequest},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/printers", get(list_printers))
        .route("/printers/counters", get(counters_for_date))
        .route("/printers/:id/counters", post(submit_counter))
}

#[derive(Debug, Deserialize)]
pub struct CountersQuery {
    pub date: Option<NaiveDate>,
}

pub async fn list_printers(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<printer::Model>>, ServiceError> {
    Ok(Json(state.services.printers.list().await?))
}

pub async fn counters_for_date(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(query): Query<CountersQuery>,
) -> Result<Json<Vec<PrinterCounterView>>, ServiceError> {
    let date = query.date.ok_or_else(|| {
        ServiceError::ValidationError("date=YYYY-MM-DD is required".to_string())
    })?;
    Ok(Json(state.services.printers.counters_for_date(date).await?))
}

pub async fn submit_counter(
    State(state): State<AppState>,
    Path(printer_id): Path<i32>,
    auth_user: AuthUser,
    Json(request): Json<SubmitCounterRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    require_admin(&auth_user)?;
    let counter: printer_counter::Model = state
        .services
        .printers
        .submit_counter(printer_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(counter)))
}
