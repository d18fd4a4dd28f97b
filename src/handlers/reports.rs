use crate::{
    auth::AuthUser, errors::ServiceError, services::reports::DailySummaryResponse, AppState,
};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;

pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/daily/:date/summary", get(daily_summary))
}

pub async fn daily_summary(
    State(state): State<AppState>,
    Path(date): Path<String>,
    _auth_user: AuthUser,
) -> Result<Json<DailySummaryResponse>, ServiceError> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| ServiceError::ValidationError("date must be YYYY-MM-DD".to_string()))?;
    Ok(Json(state.services.reports.daily_summary(date).await?))
}
