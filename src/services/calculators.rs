use crate::{
    entities::pricing_flyers_tier::{self, Entity as PricingFlyersTierEntity},
    errors::ServiceError,
    services::order_items::ComponentInput,
    services::presets::PresetService,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

/// How many finished pieces of each format fit on one SRA3 press sheet.
fn up_on_sra3(format: &str) -> u32 {
    match format {
        "A4" => 2,
        "A5" => 4,
        _ => 8, // A6 and anything smaller
    }
}

const WASTE_RATIO: f64 = 0.02;

fn paper_material_name(density: i32) -> &'static str {
    if density >= 150 {
        "Coated paper 150 g/m2, SRA3"
    } else {
        "Coated paper 130 g/m2, SRA3"
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FlyersPriceRequest {
    pub format: String,
    pub qty: i32,
    pub sides: i32,
    #[serde(rename = "paperDensity")]
    pub paper_density: Option<i32>,
    pub lamination: Option<String>,
    #[serde(rename = "priceType")]
    pub price_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FlyersPriceResponse {
    #[serde(rename = "pricePerItem")]
    pub price_per_item: Decimal,
    #[serde(rename = "totalPrice")]
    pub total_price: Decimal,
    #[serde(rename = "totalSheets")]
    pub total_sheets: i64,
    pub components: Vec<ComponentInput>,
    #[schema(value_type = Object)]
    pub derived: Value,
}

/// Sheet-based flyer pricing over the quantity-tier table, with the
/// material components the resulting order item should consume.
#[derive(Clone)]
pub struct CalculatorService {
    db: Arc<DatabaseConnection>,
    presets: Arc<PresetService>,
}

impl CalculatorService {
    pub fn new(db: Arc<DatabaseConnection>, presets: Arc<PresetService>) -> Self {
        Self { db, presets }
    }

    /// Option schema rendered by the public calculator widget.
    pub fn flyers_schema(&self) -> Value {
        json!({
            "slug": "flyers-color",
            "name": "Color flyers",
            "options": {
                "format": ["A6", "A5", "A4"],
                "sides": [1, 2],
                "qtySteps": [50, 100, 200, 300, 500, 1000, 2000, 5000],
                "paperDensity": [130, 150],
                "lamination": ["none", "matte", "glossy"],
                "priceType": ["rush", "online", "promo"]
            }
        })
    }

    #[instrument(skip(self))]
    pub async fn flyers_price(
        &self,
        request: FlyersPriceRequest,
    ) -> Result<FlyersPriceResponse, ServiceError> {
        if request.qty <= 0 || request.sides <= 0 || request.format.is_empty() {
            return Err(ServiceError::ValidationError(
                "format, qty and sides are required".to_string(),
            ));
        }

        let density = request.paper_density.unwrap_or(130);
        let price_type = request.price_type.as_deref().unwrap_or("rush");

        let up = up_on_sra3(&request.format);
        let sra3_per_item = 1.0 / f64::from(up);
        let per_item_with_waste = sra3_per_item * (1.0 + WASTE_RATIO);
        let total_sheets = (f64::from(request.qty) * per_item_with_waste).ceil() as i64;

        let single = self
            .sheet_price_single(&request.format, price_type, density, request.qty)
            .await?
            .unwrap_or(Decimal::ZERO);

        let sides_k = if request.sides == 2 { dec!(1.6) } else { dec!(1.0) };
        // Lamination is not priced into flyers; the option only drives
        // finishing downstream.
        let sheet_price = (single * sides_k).round_dp(2);
        let total_price = (Decimal::from(total_sheets) * sheet_price).round_dp(2);
        let price_per_item = (total_price / Decimal::from(request.qty.max(1))).round_dp(2);

        let mut components = Vec::new();
        if let Some(material_id) = self
            .presets
            .material_id_by_name(paper_material_name(density))
            .await?
        {
            components.push(ComponentInput {
                material_id,
                qty_per_item: per_item_with_waste,
            });
        }

        Ok(FlyersPriceResponse {
            price_per_item,
            total_price,
            total_sheets,
            components,
            derived: json!({
                "up": up,
                "sra3PerItem": sra3_per_item,
                "wasteRatio": WASTE_RATIO,
            }),
        })
    }

    /// Applicable tier: greatest min_qty not exceeding the quantity.
    async fn sheet_price_single(
        &self,
        format: &str,
        price_type: &str,
        density: i32,
        qty: i32,
    ) -> Result<Option<Decimal>, ServiceError> {
        Ok(PricingFlyersTierEntity::find()
            .filter(pricing_flyers_tier::Column::Format.eq(format))
            .filter(pricing_flyers_tier::Column::PriceType.eq(price_type))
            .filter(pricing_flyers_tier::Column::PaperDensity.eq(density))
            .filter(pricing_flyers_tier::Column::MinQty.lte(qty))
            .order_by_desc(pricing_flyers_tier::Column::MinQty)
            .one(&*self.db)
            .await?
            .map(|t| t.sheet_price_single))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smaller_formats_pack_more_per_sheet() {
        assert_eq!(up_on_sra3("A6"), 8);
        assert_eq!(up_on_sra3("A5"), 4);
        assert_eq!(up_on_sra3("A4"), 2);
    }

    #[test]
    fn sheet_count_includes_waste_allowance() {
        // 100 A6 flyers: 100 / 8 * 1.02 = 12.75 -> 13 sheets
        let per_item = (1.0 / 8.0) * (1.0 + WASTE_RATIO);
        assert_eq!((100.0 * per_item).ceil() as i64, 13);
    }

    #[test]
    fn density_maps_to_stock_paper() {
        assert_eq!(paper_material_name(130), "Coated paper 130 g/m2, SRA3");
        assert_eq!(paper_material_name(150), "Coated paper 150 g/m2, SRA3");
        assert_eq!(paper_material_name(170), "Coated paper 150 g/m2, SRA3");
    }
}
