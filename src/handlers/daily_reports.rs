use crate::{
    auth::AuthUser,
    errors::ServiceError,
    services::daily_reports::{
        CreateDailyReportRequest, DailyReportResponse, FullReportResponse, ListReportsQuery,
        PatchDailyReportRequest, SaveFullReportRequest, TargetUserQuery,
    },
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde_json::json;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/daily", post(create_report))
        .route("/daily/:date", get(get_report).patch(patch_report))
        .route("/daily-reports", get(list_reports))
        .route("/daily-reports/:id", delete(delete_report))
        .route("/daily-reports/full/:date", get(full_report))
        .route("/daily-reports/full", post(save_full_report))
}

fn parse_date(raw: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ServiceError::ValidationError("date must be YYYY-MM-DD".to_string()))
}

/// Create today's report for the calling user
#[utoipa::path(
    post,
    path = "/api/daily",
    request_body = CreateDailyReportRequest,
    responses(
        (status = 201, description = "Report created", body = DailyReportResponse),
        (status = 400, description = "Not the current date", body = crate::errors::ErrorResponse),
        (status = 403, description = "Creating for another user", body = crate::errors::ErrorResponse),
        (status = 409, description = "Report already exists for this date and user", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn create_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateDailyReportRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let report = state
        .services
        .daily_reports
        .create(&auth_user, request)
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// Read one report; admins may target another user via ?user_id=
#[utoipa::path(
    get,
    path = "/api/daily/{date}",
    params(("date" = String, Path, description = "Report date, YYYY-MM-DD")),
    responses(
        (status = 200, description = "The report", body = DailyReportResponse),
        (status = 404, description = "No report for this date and user", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn get_report(
    State(state): State<AppState>,
    Path(date): Path<String>,
    auth_user: AuthUser,
    Query(target): Query<TargetUserQuery>,
) -> Result<Json<DailyReportResponse>, ServiceError> {
    let date = parse_date(&date)?;
    let report = state
        .services
        .daily_reports
        .get(&auth_user, date, target)
        .await?;
    Ok(Json(report))
}

/// Patch report aggregates; owner reassignment is admin-only
#[utoipa::path(
    patch,
    path = "/api/daily/{date}",
    params(("date" = String, Path, description = "Report date, YYYY-MM-DD")),
    request_body = PatchDailyReportRequest,
    responses(
        (status = 200, description = "Updated report", body = DailyReportResponse),
        (status = 404, description = "No report for this date and user", body = crate::errors::ErrorResponse),
        (status = 409, description = "Reassignment collides with an existing report", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn patch_report(
    State(state): State<AppState>,
    Path(date): Path<String>,
    auth_user: AuthUser,
    Query(target): Query<TargetUserQuery>,
    Json(request): Json<PatchDailyReportRequest>,
) -> Result<Json<DailyReportResponse>, ServiceError> {
    let date = parse_date(&date)?;
    let report = state
        .services
        .daily_reports
        .patch(&auth_user, date, target, request)
        .await?;
    Ok(Json(report))
}

pub async fn list_reports(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<ListReportsQuery>,
) -> Result<Json<Vec<DailyReportResponse>>, ServiceError> {
    Ok(Json(
        state.services.daily_reports.list(&auth_user, query).await?,
    ))
}

pub async fn delete_report(
    State(state): State<AppState>,
    Path(report_id): Path<i32>,
    _auth_user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.daily_reports.delete(report_id).await?;
    Ok(Json(json!({ "message": "Report deleted" })))
}

pub async fn full_report(
    State(state): State<AppState>,
    Path(date): Path<String>,
    auth_user: AuthUser,
    Query(target): Query<TargetUserQuery>,
) -> Result<Json<FullReportResponse>, ServiceError> {
    let date = parse_date(&date)?;
    Ok(Json(
        state
            .services
            .daily_reports
            .full_report(&auth_user, date, target)
            .await?,
    ))
}

/// Persist a client-computed snapshot verbatim into the existing report.
pub async fn save_full_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<SaveFullReportRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    state
        .services
        .daily_reports
        .save_full(&auth_user, request)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Full report saved" })),
    ))
}
