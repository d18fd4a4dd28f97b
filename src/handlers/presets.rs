use crate::{
    auth::{require_admin, AuthUser},
    errors::ServiceError,
    services::presets::{PresetCategoryView, RecipeRow, SetRecipeRequest},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/presets", get(list_presets))
        .route(
            "/product-materials/:category/:description",
            get(get_recipe),
        )
        .route("/product-materials", post(set_recipe))
}

/// Public price catalog for the order widget.
pub async fn list_presets(
    State(state): State<AppState>,
) -> Result<Json<Vec<PresetCategoryView>>, ServiceError> {
    Ok(Json(state.services.presets.list_presets().await?))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    Path((category, description)): Path<(String, String)>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<RecipeRow>>, ServiceError> {
    Ok(Json(
        state.services.presets.recipe(&category, &description).await?,
    ))
}

pub async fn set_recipe(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<SetRecipeRequest>,
) -> Result<StatusCode, ServiceError> {
    require_admin(&auth_user)?;
    state.services.presets.set_recipe(request).await?;
    Ok(StatusCode::NO_CONTENT)
}
