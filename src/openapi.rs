use axum::Json;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "Bearer",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

/// OpenAPI document covering the primary resources. Secondary endpoints
/// (presets, printers, files, calculators) are intentionally undocumented
/// here; they serve the bundled client only.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "printshop-api",
        description = "Print-shop management backend: orders, inventory-aware line items, daily reports"
    ),
    paths(
        crate::handlers::auth::login,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::create_order,
        crate::handlers::orders::delete_order,
        crate::handlers::orders::add_order_item,
        crate::handlers::orders::update_order_item,
        crate::handlers::orders::delete_order_item,
        crate::handlers::materials::list_materials,
        crate::handlers::materials::upsert_material,
        crate::handlers::materials::spend,
        crate::handlers::materials::list_moves,
        crate::handlers::daily_reports::create_report,
        crate::handlers::daily_reports::get_report,
        crate::handlers::daily_reports::patch_report,
    ),
    components(schemas(
        crate::entities::material::Model,
        crate::errors::ErrorResponse,
        crate::services::orders::OrderResponse,
        crate::services::orders::ItemResponse,
        crate::services::orders::CreateOrderRequest,
        crate::services::order_items::AddItemRequest,
        crate::services::order_items::UpdateItemRequest,
        crate::services::order_items::ComponentInput,
        crate::services::materials::MaterialUpsertRequest,
        crate::services::materials::SpendRequest,
        crate::services::materials::MoveResponse,
        crate::services::daily_reports::CreateDailyReportRequest,
        crate::services::daily_reports::PatchDailyReportRequest,
        crate::services::daily_reports::DailyReportResponse,
        crate::services::users::LoginRequest,
        crate::services::users::LoginResponse,
    )),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

/// Serves the generated document; the UI bundle is not shipped.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
