use crate::{
    errors::ServiceError,
    services::users::{LoginRequest, LoginResponse},
    AppState,
};
use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;

pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Password login. A successful login opens today's daily report for the
/// user as a side effect.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token and session info", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ServiceError> {
    let user = state.services.users.authenticate(&request).await?;

    state.services.daily_reports.ensure_for_today(user.id).await?;

    let today = Utc::now().date_naive();
    Ok(Json(LoginResponse {
        token: user.api_token,
        name: user.name,
        role: user.role,
        user_id: user.id,
        session_date: today.format("%Y-%m-%d").to_string(),
    }))
}
