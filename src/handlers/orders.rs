use crate::{
    auth::{require_admin, AuthUser},
    errors::ServiceError,
    services::order_items::{AddItemRequest, UpdateItemRequest},
    services::orders::{
        CreateOrderRequest, CreatePrepaymentRequest, ItemResponse, NormalizePricesResponse,
        OrderResponse, PaymentWebhookRequest, UpdateOrderStatusRequest,
    },
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/:id", delete(delete_order))
        .route("/orders/:id/status", put(update_order_status))
        .route("/orders/:id/prepay", post(create_prepayment))
        .route("/orders/:id/duplicate", post(duplicate_order))
        .route("/orders/:id/normalize-prices", post(normalize_prices))
        .route("/orders/:id/items", post(add_order_item))
        .route(
            "/orders/:id/items/:item_id",
            axum::routing::patch(update_order_item).delete(delete_order_item),
        )
        .route("/order-statuses", get(list_order_statuses))
        .route("/webhooks/bepaid", post(payment_webhook))
}

/// List the caller's orders (plus unowned ones) with items embedded
#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Orders with their items", body = Vec<OrderResponse>),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn list_orders(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<OrderResponse>>, ServiceError> {
    let orders = state.services.orders.list_orders(auth_user.id).await?;
    Ok(Json(orders))
}

/// Create an empty order; the formatted number is assigned after insert
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn create_order(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state
        .services
        .orders
        .create_order(request, Some(auth_user.id))
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    _auth_user: AuthUser,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<Json<OrderResponse>, ServiceError> {
    let order = state
        .services
        .orders
        .update_status(order_id, request.status)
        .await?;
    Ok(Json(order))
}

/// Public widget endpoint: create a prepayment link for an order.
pub async fn create_prepayment(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    Json(request): Json<CreatePrepaymentRequest>,
) -> Result<Json<OrderResponse>, ServiceError> {
    let order = state
        .services
        .orders
        .create_prepayment(order_id, request.amount)
        .await?;
    Ok(Json(order))
}

/// Payment-provider status webhook; unauthenticated, keyed by payment id.
pub async fn payment_webhook(
    State(state): State<AppState>,
    Json(request): Json<PaymentWebhookRequest>,
) -> Result<StatusCode, ServiceError> {
    let payment_id = request
        .payment_id
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ServiceError::ValidationError("payment_id is required".to_string()))?;
    state
        .services
        .orders
        .apply_payment_webhook(payment_id, request.status.as_deref().unwrap_or_default())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn duplicate_order(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    _auth_user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.orders.duplicate_order(order_id).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn normalize_prices(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    auth_user: AuthUser,
) -> Result<Json<NormalizePricesResponse>, ServiceError> {
    require_admin(&auth_user)?;
    let result = state.services.orders.normalize_prices(order_id).await?;
    Ok(Json(result))
}

/// Delete an order, reversing its aggregated material consumption
#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 204, description = "Order deleted, stock returned"),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    auth_user: AuthUser,
) -> Result<StatusCode, ServiceError> {
    state
        .services
        .order_items
        .delete_order(order_id, Some(auth_user.id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a line item, atomically deducting the required materials
#[utoipa::path(
    post,
    path = "/api/orders/{id}/items",
    params(("id" = i32, Path, description = "Order id")),
    request_body = AddItemRequest,
    responses(
        (status = 201, description = "Item created with stock deducted", body = ItemResponse),
        (status = 400, description = "Validation failure or insufficient stock", body = crate::errors::ErrorResponse),
    )
)]
pub async fn add_order_item(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    auth_user: Option<AuthUser>,
    Json(request): Json<AddItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state
        .services
        .order_items
        .add_item(order_id, request, auth_user.map(|u| u.id))
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Partially update an item; a quantity change adjusts stock by the delta
#[utoipa::path(
    patch,
    path = "/api/orders/{order_id}/items/{item_id}",
    params(
        ("order_id" = i32, Path, description = "Order id"),
        ("item_id" = i32, Path, description = "Item id"),
    ),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Updated item", body = ItemResponse),
        (status = 400, description = "Insufficient stock for the quantity increase", body = crate::errors::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn update_order_item(
    State(state): State<AppState>,
    Path((order_id, item_id)): Path<(i32, i32)>,
    auth_user: AuthUser,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, ServiceError> {
    let item = state
        .services
        .order_items
        .update_item(order_id, item_id, request, Some(auth_user.id))
        .await?;
    Ok(Json(item))
}

/// Remove an item, returning its recipe consumption to stock; idempotent
#[utoipa::path(
    delete,
    path = "/api/orders/{order_id}/items/{item_id}",
    params(
        ("order_id" = i32, Path, description = "Order id"),
        ("item_id" = i32, Path, description = "Item id"),
    ),
    responses(
        (status = 204, description = "Item removed (or was already absent)"),
    ),
    security(("Bearer" = []))
)]
pub async fn delete_order_item(
    State(state): State<AppState>,
    Path((order_id, item_id)): Path<(i32, i32)>,
    auth_user: AuthUser,
) -> Result<StatusCode, ServiceError> {
    state
        .services
        .order_items
        .remove_item(order_id, item_id, Some(auth_user.id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_order_statuses(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let statuses = state.services.orders.list_statuses().await?;
    Ok(Json(statuses))
}
