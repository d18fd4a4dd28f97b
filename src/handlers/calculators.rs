use crate::{
    errors::ServiceError,
    services::calculators::{FlyersPriceRequest, FlyersPriceResponse},
    AppState,
};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/calculators/flyers-color", get(flyers_schema))
        .route("/calculators/flyers-color/price", post(flyers_price))
}

/// Public: option schema for the flyers calculator widget.
pub async fn flyers_schema(State(state): State<AppState>) -> Json<Value> {
    Json(state.services.calculators.flyers_schema())
}

/// Public: price a flyer run and return the material components to order.
pub async fn flyers_price(
    State(state): State<AppState>,
    Json(request): Json<FlyersPriceRequest>,
) -> Result<Json<FlyersPriceResponse>, ServiceError> {
    Ok(Json(state.services.calculators.flyers_price(request).await?))
}
