use crate::{
    entities::item::{self, Entity as ItemEntity},
    entities::material::Entity as MaterialEntity,
    entities::material_move::{self, Entity as MaterialMoveEntity},
    entities::order::{self, Entity as OrderEntity},
    errors::ServiceError,
    services::materials::{day_end_exclusive, day_start},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct PrepaymentSummary {
    pub paid_amount: Decimal,
    pub pending_amount: Decimal,
    pub total_amount: Decimal,
    pub paid_count: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MaterialSpentView {
    #[serde(rename = "materialId")]
    pub material_id: i32,
    pub material_name: String,
    pub spent: f64,
}

/// Operational end-of-day summary across orders, print metrics,
/// prepayments and material consumption.
#[derive(Debug, Serialize, ToSchema)]
pub struct DailySummaryResponse {
    pub date: NaiveDate,
    pub orders_count: u64,
    pub total_revenue: Decimal,
    pub items_qty: i64,
    pub total_clicks: i64,
    pub total_sheets: i64,
    pub total_waste: i64,
    pub prepayment: PrepaymentSummary,
    pub materials_spent_top: Vec<MaterialSpentView>,
}

#[derive(Clone)]
pub struct ReportService {
    db: Arc<DatabaseConnection>,
}

/// Prepayment statuses the provider reports for captured money.
fn is_paid_status(status: Option<&str>) -> bool {
    matches!(status, Some("paid") | Some("successful"))
}

impl ReportService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn daily_summary(
        &self,
        date: NaiveDate,
    ) -> Result<DailySummaryResponse, ServiceError> {
        let db = &*self.db;
        let start = day_start(date);
        let end = day_end_exclusive(date);

        let orders = OrderEntity::find()
            .filter(order::Column::CreatedAt.gte(start))
            .filter(order::Column::CreatedAt.lt(end))
            .all(db)
            .await?;

        let order_ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
        let items = if order_ids.is_empty() {
            Vec::new()
        } else {
            ItemEntity::find()
                .filter(item::Column::OrderId.is_in(order_ids))
                .all(db)
                .await?
        };

        let mut total_revenue = Decimal::ZERO;
        let mut items_qty = 0i64;
        let mut total_clicks = 0i64;
        let mut total_sheets = 0i64;
        let mut total_waste = 0i64;
        for it in &items {
            let qty = i64::from(it.quantity.max(1));
            total_revenue += it.price * Decimal::from(qty);
            items_qty += qty;
            total_clicks += i64::from(it.clicks);
            total_sheets += i64::from(it.sheets);
            total_waste += i64::from(it.waste);
        }

        let mut paid_amount = Decimal::ZERO;
        let mut pending_amount = Decimal::ZERO;
        let mut total_amount = Decimal::ZERO;
        let mut paid_count = 0u32;
        for o in &orders {
            total_amount += o.prepayment_amount;
            if is_paid_status(o.prepayment_status.as_deref()) {
                paid_amount += o.prepayment_amount;
                paid_count += 1;
            } else {
                pending_amount += o.prepayment_amount;
            }
        }

        let moves = MaterialMoveEntity::find()
            .filter(material_move::Column::CreatedAt.gte(start))
            .filter(material_move::Column::CreatedAt.lt(end))
            .filter(material_move::Column::Delta.lt(0.0))
            .all(db)
            .await?;

        let mut spent: BTreeMap<i32, f64> = BTreeMap::new();
        for m in moves {
            *spent.entry(m.material_id).or_insert(0.0) += -m.delta;
        }
        let names: BTreeMap<i32, String> = MaterialEntity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|m| (m.id, m.name))
            .collect();

        let mut materials_spent_top: Vec<MaterialSpentView> = spent
            .into_iter()
            .map(|(material_id, total)| MaterialSpentView {
                material_id,
                material_name: names.get(&material_id).cloned().unwrap_or_default(),
                spent: total,
            })
            .collect();
        materials_spent_top.sort_by(|a, b| b.spent.total_cmp(&a.spent));
        materials_spent_top.truncate(5);

        Ok(DailySummaryResponse {
            date,
            orders_count: orders.len() as u64,
            total_revenue,
            items_qty,
            total_clicks,
            total_sheets,
            total_waste,
            prepayment: PrepaymentSummary {
                paid_amount,
                pending_amount,
                total_amount,
                paid_count,
            },
            materials_spent_top,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_captured_statuses_count_as_paid() {
        assert!(is_paid_status(Some("paid")));
        assert!(is_paid_status(Some("successful")));
        assert!(!is_paid_status(Some("pending")));
        assert!(!is_paid_status(Some("failed")));
        assert!(!is_paid_status(None));
    }
}
