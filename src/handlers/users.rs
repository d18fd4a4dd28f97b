use crate::{
    auth::AuthUser,
    errors::ServiceError,
    services::users::{MeResponse, UserView},
    AppState,
};
use axum::{extract::State, routing::get, Json, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/users", get(list_users))
}

pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<MeResponse>, ServiceError> {
    Ok(Json(state.services.users.get(auth_user.id).await?))
}

/// id + name list used by the report filters.
pub async fn list_users(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<UserView>>, ServiceError> {
    Ok(Json(state.services.users.list().await?))
}
