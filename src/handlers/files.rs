use crate::{
    auth::AuthUser,
    entities::order_file,
    errors::ServiceError,
    AppState,
};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders/:id/files", get(list_files).post(upload_file))
        .route("/orders/:id/files/:file_id", delete(delete_file))
        .route("/orders/:id/files/:file_id/approve", post(approve_file))
}

pub async fn list_files(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<order_file::Model>>, ServiceError> {
    Ok(Json(state.services.files.list(order_id).await?))
}

/// Multipart upload; the part named `file` carries the payload.
pub async fn upload_file(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    _auth_user: AuthUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ServiceError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let original_name = field.file_name().map(str::to_string);
        let mime = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let stored = state
            .services
            .files
            .save(order_id, original_name, mime, bytes.to_vec())
            .await?;
        return Ok((StatusCode::CREATED, Json(stored)));
    }

    Err(ServiceError::ValidationError(
        "No file received".to_string(),
    ))
}

pub async fn delete_file(
    State(state): State<AppState>,
    Path((order_id, file_id)): Path<(i32, i32)>,
    _auth_user: AuthUser,
) -> Result<StatusCode, ServiceError> {
    state.services.files.delete(order_id, file_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn approve_file(
    State(state): State<AppState>,
    Path((order_id, file_id)): Path<(i32, i32)>,
    auth_user: AuthUser,
) -> Result<Json<order_file::Model>, ServiceError> {
    Ok(Json(
        state
            .services
            .files
            .approve(order_id, file_id, auth_user.id)
            .await?,
    ))
}
