use crate::{
    entities::material::{self, Entity as MaterialEntity},
    entities::material_move::{self, Entity as MaterialMoveEntity},
    errors::ServiceError,
};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct MaterialUpsertRequest {
    pub id: Option<i32>,
    pub name: String,
    pub unit: String,
    pub quantity: f64,
    pub min_quantity: Option<f64>,
    pub sheet_price_single: Option<Decimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpendRequest {
    pub material_id: i32,
    pub delta: f64,
    pub reason: Option<String>,
    pub order_id: Option<i32>,
}

/// Ledger query filters. Dates are inclusive day bounds.
#[derive(Debug, Default, Deserialize)]
pub struct MovesQuery {
    #[serde(rename = "materialId")]
    pub material_id: Option<i32>,
    pub user_id: Option<i32>,
    #[serde(rename = "orderId")]
    pub order_id: Option<i32>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Ledger row joined with its material name. The mixed key style matches
/// what the browser client already consumes.
#[derive(Debug, Serialize, ToSchema)]
pub struct MoveResponse {
    pub id: i32,
    #[serde(rename = "materialId")]
    pub material_id: i32,
    pub material_name: String,
    pub delta: f64,
    pub reason: Option<String>,
    #[serde(rename = "orderId")]
    pub order_id: Option<i32>,
    pub user_id: Option<i32>,
    pub created_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TopSpenderResponse {
    pub id: i32,
    pub name: String,
    pub spent: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ForecastResponse {
    pub id: i32,
    pub name: String,
    pub unit: String,
    pub quantity: f64,
    pub min_quantity: Option<f64>,
    pub suggested_order: f64,
}

/// Materials CRUD plus the manual side of the inventory ledger.
#[derive(Clone)]
pub struct MaterialService {
    db: Arc<DatabaseConnection>,
}

impl MaterialService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<material::Model>, ServiceError> {
        Ok(MaterialEntity::find()
            .order_by_asc(material::Column::Name)
            .all(&*self.db)
            .await?)
    }

    /// Creates or updates a material; duplicate names conflict. Returns
    /// the full list, which is what the admin screen re-renders.
    #[instrument(skip(self, request))]
    pub async fn upsert(
        &self,
        request: MaterialUpsertRequest,
    ) -> Result<Vec<material::Model>, ServiceError> {
        let result = match request.id {
            Some(id) => {
                let existing = MaterialEntity::find_by_id(id)
                    .one(&*self.db)
                    .await?
                    .ok_or_else(|| ServiceError::NotFound("Material not found".to_string()))?;
                let mut active: material::ActiveModel = existing.into();
                active.name = Set(request.name);
                active.unit = Set(request.unit);
                active.quantity = Set(request.quantity);
                active.min_quantity = Set(request.min_quantity);
                active.sheet_price_single = Set(request.sheet_price_single);
                active.update(&*self.db).await.map(|_| ())
            }
            None => material::ActiveModel {
                name: Set(request.name),
                unit: Set(request.unit),
                quantity: Set(request.quantity),
                min_quantity: Set(request.min_quantity),
                sheet_price_single: Set(request.sheet_price_single),
                ..Default::default()
            }
            .insert(&*self.db)
            .await
            .map(|_| ()),
        };

        result.map_err(|e| {
            ServiceError::conflict_on_unique(e, "A material with this name already exists")
        })?;

        self.list().await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, material_id: i32) -> Result<(), ServiceError> {
        MaterialEntity::delete_by_id(material_id)
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    /// Manual signed stock adjustment with its ledger entry, atomic.
    #[instrument(skip(self, request))]
    pub async fn spend(
        &self,
        request: SpendRequest,
        user_id: i32,
    ) -> Result<material::Model, ServiceError> {
        MaterialEntity::find_by_id(request.material_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Material not found".to_string()))?;

        let txn = self.db.begin().await?;

        MaterialEntity::update_many()
            .col_expr(
                material::Column::Quantity,
                Expr::col(material::Column::Quantity).add(request.delta),
            )
            .filter(material::Column::Id.eq(request.material_id))
            .exec(&txn)
            .await?;

        material_move::ActiveModel {
            material_id: Set(request.material_id),
            delta: Set(request.delta),
            reason: Set(request.reason),
            order_id: Set(request.order_id),
            user_id: Set(Some(user_id)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            material_id = request.material_id,
            delta = request.delta,
            "manual stock adjustment"
        );

        MaterialEntity::find_by_id(request.material_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Material not found".to_string()))
    }

    /// Ledger history, newest first, filterable by material, order, user
    /// and date range.
    #[instrument(skip(self))]
    pub async fn moves(&self, query: MovesQuery) -> Result<Vec<MoveResponse>, ServiceError> {
        let mut finder = MaterialMoveEntity::find();
        if let Some(material_id) = query.material_id {
            finder = finder.filter(material_move::Column::MaterialId.eq(material_id));
        }
        if let Some(user_id) = query.user_id {
            finder = finder.filter(material_move::Column::UserId.eq(user_id));
        }
        if let Some(order_id) = query.order_id {
            finder = finder.filter(material_move::Column::OrderId.eq(order_id));
        }
        if let Some(from) = query.from {
            finder = finder.filter(material_move::Column::CreatedAt.gte(day_start(from)));
        }
        if let Some(to) = query.to {
            finder = finder.filter(material_move::Column::CreatedAt.lt(day_end_exclusive(to)));
        }

        let rows = finder
            .order_by_desc(material_move::Column::CreatedAt)
            .order_by_desc(material_move::Column::Id)
            .all(&*self.db)
            .await?;

        let names = self.material_names().await?;
        Ok(rows
            .into_iter()
            .map(|m| MoveResponse {
                id: m.id,
                material_id: m.material_id,
                material_name: names.get(&m.material_id).cloned().unwrap_or_default(),
                delta: m.delta,
                reason: m.reason,
                order_id: m.order_id,
                user_id: m.user_id,
                created_at: m.created_at,
            })
            .collect())
    }

    /// Materials at or below their reorder floor.
    #[instrument(skip(self))]
    pub async fn low_stock(&self) -> Result<Vec<material::Model>, ServiceError> {
        Ok(MaterialEntity::find()
            .filter(material::Column::MinQuantity.is_not_null())
            .filter(
                Expr::col(material::Column::Quantity)
                    .lte(Expr::col(material::Column::MinQuantity)),
            )
            .order_by_asc(material::Column::Name)
            .all(&*self.db)
            .await?)
    }

    /// Top consumers over a period: per-material sum of negative deltas.
    #[instrument(skip(self))]
    pub async fn top_spenders(
        &self,
        query: TopQuery,
    ) -> Result<Vec<TopSpenderResponse>, ServiceError> {
        let mut finder = MaterialMoveEntity::find().filter(material_move::Column::Delta.lt(0.0));
        if let Some(from) = query.from {
            finder = finder.filter(material_move::Column::CreatedAt.gte(day_start(from)));
        }
        if let Some(to) = query.to {
            finder = finder.filter(material_move::Column::CreatedAt.lt(day_end_exclusive(to)));
        }

        let rows = finder.all(&*self.db).await?;

        let mut spent: BTreeMap<i32, f64> = BTreeMap::new();
        for row in rows {
            *spent.entry(row.material_id).or_insert(0.0) += -row.delta;
        }

        let names = self.material_names().await?;
        let mut result: Vec<TopSpenderResponse> = spent
            .into_iter()
            .map(|(id, total)| TopSpenderResponse {
                id,
                name: names.get(&id).cloned().unwrap_or_default(),
                spent: total,
            })
            .collect();
        result.sort_by(|a, b| b.spent.total_cmp(&a.spent));
        result.truncate(query.limit.unwrap_or(10) as usize);
        Ok(result)
    }

    /// Reorder suggestions for materials under their floor. The suggested
    /// amount is the shop's rule of thumb: half the current stock, at
    /// least enough to be worth a supplier call.
    #[instrument(skip(self))]
    pub async fn forecast(&self) -> Result<Vec<ForecastResponse>, ServiceError> {
        let mut low = self.low_stock().await?;
        low.sort_by(|a, b| {
            let gap_a = a.min_quantity.unwrap_or(0.0) - a.quantity;
            let gap_b = b.min_quantity.unwrap_or(0.0) - b.quantity;
            gap_b.total_cmp(&gap_a)
        });

        Ok(low
            .into_iter()
            .map(|m| ForecastResponse {
                id: m.id,
                name: m.name,
                unit: m.unit,
                suggested_order: (m.quantity * 0.5 * 100.0).round() / 100.0,
                quantity: m.quantity,
                min_quantity: m.min_quantity,
            })
            .collect())
    }

    async fn material_names(&self) -> Result<BTreeMap<i32, String>, ServiceError> {
        Ok(MaterialEntity::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|m| (m.id, m.name))
            .collect())
    }
}

pub(crate) fn day_start(date: NaiveDate) -> chrono::DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default())
}

pub(crate) fn day_end_exclusive(date: NaiveDate) -> chrono::DateTime<Utc> {
    day_start(date + chrono::Days::new(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_cover_the_whole_day() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let start = day_start(date);
        let end = day_end_exclusive(date);
        assert_eq!(start.to_rfc3339(), "2025-03-14T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-03-15T00:00:00+00:00");
        assert!(start < end);
    }
}
