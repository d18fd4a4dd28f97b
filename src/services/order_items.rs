use crate::{
    entities::item::{self, Entity as ItemEntity},
    entities::material::{self, Entity as MaterialEntity},
    entities::material_move,
    entities::order::{self, Entity as OrderEntity},
    entities::product_material::{self, Entity as ProductMaterialEntity},
    errors::ServiceError,
    services::orders::ItemResponse,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

/// Explicit material requirement supplied by a caller, overriding the
/// preset recipe lookup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInput {
    pub material_id: i32,
    pub qty_per_item: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    #[serde(rename = "type")]
    pub item_type: String,
    /// Free-form attributes; must contain a `description`
    #[schema(value_type = Object)]
    pub params: Value,
    pub price: Decimal,
    pub quantity: Option<i32>,
    pub printer_id: Option<i32>,
    pub sides: Option<i32>,
    pub sheets: Option<i32>,
    pub waste: Option<i32>,
    pub components: Option<Vec<ComponentInput>>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
    /// Absent leaves the printer untouched; explicit null clears it
    #[serde(default)]
    pub printer_id: Option<Option<i32>>,
    pub sides: Option<i32>,
    pub sheets: Option<i32>,
    pub waste: Option<i32>,
}

/// A material requirement resolved against current stock.
#[derive(Debug, Clone)]
struct RequiredMaterial {
    material_id: i32,
    qty_per_item: f64,
    stock: f64,
    min_quantity: Option<f64>,
}

/// Derived print-run metric: each sheet side counts two clicks on the
/// SRA3 press, so a duplex sheet costs four.
fn clicks_for(sheets: i32, sides: i32) -> i32 {
    sheets.max(0) * sides.max(1) * 2
}

/// A deduction violates the floor when it would take stock below
/// min_quantity; an unset floor never blocks.
fn violates_min(stock: f64, needed: f64, min_quantity: Option<f64>) -> bool {
    let floor = min_quantity.unwrap_or(f64::NEG_INFINITY);
    stock - needed < floor
}

fn description_of(params: &Value) -> Option<&str> {
    params.get("description").and_then(Value::as_str)
}

/// Applies an item addition, removal or change to an order while keeping
/// material stock and the movement ledger consistent with it, as a single
/// all-or-nothing operation.
#[derive(Clone)]
pub struct OrderItemService {
    db: Arc<DatabaseConnection>,
}

impl OrderItemService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Adds a line item to an order, deducting the required materials.
    ///
    /// Fails wholesale with an insufficient-stock rejection (naming the
    /// offending material) when any deduction would breach a material's
    /// floor; nothing is written in that case.
    #[instrument(skip(self, request))]
    pub async fn add_item(
        &self,
        order_id: i32,
        request: AddItemRequest,
        acting_user: Option<i32>,
    ) -> Result<ItemResponse, ServiceError> {
        let description = description_of(&request.params)
            .ok_or_else(|| {
                ServiceError::ValidationError("params.description is required".to_string())
            })?
            .to_string();

        let quantity = request.quantity.unwrap_or(1).max(1);
        let sides = request.sides.unwrap_or(1).max(1);
        let sheets = request.sheets.unwrap_or(0).max(0);
        let waste = request.waste.unwrap_or(0).max(0);

        OrderEntity::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;

        let txn = self.db.begin().await?;

        let needed = match request.components.as_deref() {
            Some(components) if !components.is_empty() => {
                resolve_explicit_components(&txn, components).await?
            }
            _ => resolve_recipe(&txn, &request.item_type, &description).await?,
        };

        // Check every material before touching any of them.
        for requirement in &needed {
            let needed_qty = requirement.qty_per_item * f64::from(quantity);
            if violates_min(requirement.stock, needed_qty, requirement.min_quantity) {
                return Err(ServiceError::InsufficientStock {
                    material_id: requirement.material_id,
                });
            }
        }

        for requirement in &needed {
            let needed_qty = requirement.qty_per_item * f64::from(quantity);
            apply_stock_delta(
                &txn,
                requirement.material_id,
                -needed_qty,
                "order add item",
                Some(order_id),
                acting_user,
            )
            .await?;
        }

        // Explicit components travel with the item so the consumption that
        // actually happened stays reconstructible.
        let mut stored_params = request.params.clone();
        if let (Some(obj), Some(components)) =
            (stored_params.as_object_mut(), request.components.as_ref())
        {
            obj.insert(
                "components".to_string(),
                serde_json::to_value(components)
                    .map_err(|e| ServiceError::InternalError(e.to_string()))?,
            );
        }

        let inserted = item::ActiveModel {
            order_id: Set(order_id),
            item_type: Set(request.item_type.clone()),
            params: Set(stored_params.to_string()),
            price: Set(request.price),
            quantity: Set(quantity),
            printer_id: Set(request.printer_id),
            sides: Set(sides),
            sheets: Set(sheets),
            waste: Set(waste),
            clicks: Set(clicks_for(sheets, sides)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            order_id,
            item_id = inserted.id,
            materials = needed.len(),
            "item added with stock deduction"
        );
        Ok(ItemResponse::from_model(inserted))
    }

    /// Partially updates an item. A quantity change adjusts material stock
    /// by the recipe-derived delta inside the same transaction.
    #[instrument(skip(self, request))]
    pub async fn update_item(
        &self,
        order_id: i32,
        item_id: i32,
        request: UpdateItemRequest,
        acting_user: Option<i32>,
    ) -> Result<ItemResponse, ServiceError> {
        let existing = ItemEntity::find()
            .filter(item::Column::Id.eq(item_id))
            .filter(item::Column::OrderId.eq(order_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Item not found".to_string()))?;

        let new_quantity = request
            .quantity
            .map(|q| q.max(1))
            .unwrap_or(existing.quantity.max(1));
        let delta_qty = new_quantity - existing.quantity.max(1);

        let txn = self.db.begin().await?;

        if delta_qty != 0 {
            let params: Value = serde_json::from_str(&existing.params).unwrap_or_default();
            let description = description_of(&params).unwrap_or_default().to_string();
            let composition = resolve_recipe(&txn, &existing.item_type, &description).await?;

            if delta_qty > 0 {
                for requirement in &composition {
                    let need = requirement.qty_per_item * f64::from(delta_qty);
                    if violates_min(requirement.stock, need, requirement.min_quantity) {
                        return Err(ServiceError::InsufficientStock {
                            material_id: requirement.material_id,
                        });
                    }
                }
                for requirement in &composition {
                    let need = requirement.qty_per_item * f64::from(delta_qty);
                    if need > 0.0 {
                        apply_stock_delta(
                            &txn,
                            requirement.material_id,
                            -need,
                            "order update qty +",
                            Some(order_id),
                            acting_user,
                        )
                        .await?;
                    }
                }
            } else {
                for requirement in &composition {
                    let back = requirement.qty_per_item * f64::from(delta_qty.abs());
                    if back > 0.0 {
                        apply_stock_delta(
                            &txn,
                            requirement.material_id,
                            back,
                            "order update qty -",
                            Some(order_id),
                            acting_user,
                        )
                        .await?;
                    }
                }
            }
        }

        let next_sides = request.sides.map(|s| s.max(1)).unwrap_or(existing.sides);
        let next_sheets = request.sheets.map(|s| s.max(0)).unwrap_or(existing.sheets);

        // Field presence decides what gets updated; no dynamic SQL.
        let mut active: item::ActiveModel = existing.into();
        if let Some(price) = request.price {
            active.price = Set(price);
        }
        if request.quantity.is_some() {
            active.quantity = Set(new_quantity);
        }
        if let Some(printer_id) = request.printer_id {
            active.printer_id = Set(printer_id);
        }
        if request.sides.is_some() {
            active.sides = Set(next_sides);
        }
        if request.sheets.is_some() {
            active.sheets = Set(next_sheets);
        }
        if let Some(w) = request.waste {
            active.waste = Set(w.max(0));
        }
        active.clicks = Set(clicks_for(next_sheets, next_sides));

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        Ok(ItemResponse::from_model(updated))
    }

    /// Removes an item, returning its recipe-derived consumption to stock.
    /// Deleting an absent item is a silent no-op.
    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        order_id: i32,
        item_id: i32,
        acting_user: Option<i32>,
    ) -> Result<(), ServiceError> {
        let Some(existing) = ItemEntity::find()
            .filter(item::Column::Id.eq(item_id))
            .filter(item::Column::OrderId.eq(order_id))
            .one(&*self.db)
            .await?
        else {
            return Ok(());
        };

        let params: Value = serde_json::from_str(&existing.params).unwrap_or_default();
        let description = description_of(&params).unwrap_or_default().to_string();

        let txn = self.db.begin().await?;

        // Restitution follows the preset recipe looked up by the stored
        // description, not any explicit components used at creation.
        let composition = resolve_recipe(&txn, &existing.item_type, &description).await?;
        for requirement in &composition {
            let return_qty = requirement.qty_per_item * f64::from(existing.quantity.max(1));
            if return_qty > 0.0 {
                apply_stock_delta(
                    &txn,
                    requirement.material_id,
                    return_qty,
                    "order delete item",
                    Some(order_id),
                    acting_user,
                )
                .await?;
            }
        }

        ItemEntity::delete_many()
            .filter(item::Column::Id.eq(item_id))
            .filter(item::Column::OrderId.eq(order_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        info!(order_id, item_id, "item removed, stock returned");
        Ok(())
    }

    /// Deletes an order: aggregates every item's recipe consumption per
    /// material, returns each once, then removes the order (items cascade).
    #[instrument(skip(self))]
    pub async fn delete_order(
        &self,
        order_id: i32,
        acting_user: Option<i32>,
    ) -> Result<(), ServiceError> {
        let items = ItemEntity::find()
            .filter(item::Column::OrderId.eq(order_id))
            .all(&*self.db)
            .await?;

        let txn = self.db.begin().await?;

        let mut returns: BTreeMap<i32, f64> = BTreeMap::new();
        for it in &items {
            let params: Value = serde_json::from_str(&it.params).unwrap_or_default();
            let description = description_of(&params).unwrap_or_default().to_string();
            let composition = resolve_recipe(&txn, &it.item_type, &description).await?;
            for requirement in composition {
                let add = requirement.qty_per_item * f64::from(it.quantity.max(1));
                *returns.entry(requirement.material_id).or_insert(0.0) += add;
            }
        }

        for (material_id, add_qty) in returns {
            if add_qty > 0.0 {
                apply_stock_delta(
                    &txn,
                    material_id,
                    add_qty,
                    "order delete",
                    Some(order_id),
                    acting_user,
                )
                .await?;
            }
        }

        OrderEntity::delete_many()
            .filter(order::Column::Id.eq(order_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        info!(order_id, "order deleted, aggregated stock returned");
        Ok(())
    }
}

/// Loads the preset recipe for (category, description) together with the
/// current stock of each referenced material.
async fn resolve_recipe(
    txn: &DatabaseTransaction,
    category: &str,
    description: &str,
) -> Result<Vec<RequiredMaterial>, ServiceError> {
    let rows = ProductMaterialEntity::find()
        .filter(product_material::Column::PresetCategory.eq(category))
        .filter(product_material::Column::PresetDescription.eq(description))
        .all(txn)
        .await?;

    let mut needed = Vec::with_capacity(rows.len());
    for row in rows {
        let mat = MaterialEntity::find_by_id(row.material_id)
            .one(txn)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "recipe references missing material {}",
                    row.material_id
                ))
            })?;
        needed.push(RequiredMaterial {
            material_id: row.material_id,
            qty_per_item: row.qty_per_item,
            stock: mat.quantity,
            min_quantity: mat.min_quantity,
        });
    }
    Ok(needed)
}

/// Loads caller-supplied components against current stock.
async fn resolve_explicit_components(
    txn: &DatabaseTransaction,
    components: &[ComponentInput],
) -> Result<Vec<RequiredMaterial>, ServiceError> {
    let ids: Vec<i32> = components.iter().map(|c| c.material_id).collect();
    let materials = MaterialEntity::find()
        .filter(material::Column::Id.is_in(ids))
        .all(txn)
        .await?;

    components
        .iter()
        .map(|component| {
            let mat = materials
                .iter()
                .find(|m| m.id == component.material_id)
                .ok_or_else(|| {
                    ServiceError::ValidationError(format!(
                        "unknown material {}",
                        component.material_id
                    ))
                })?;
            Ok(RequiredMaterial {
                material_id: component.material_id,
                qty_per_item: component.qty_per_item,
                stock: mat.quantity,
                min_quantity: mat.min_quantity,
            })
        })
        .collect()
}

/// Applies one signed stock change and its matching ledger row. Every
/// caller runs inside a transaction, so a later failure unwinds both.
async fn apply_stock_delta<C: ConnectionTrait>(
    conn: &C,
    material_id: i32,
    delta: f64,
    reason: &str,
    order_id: Option<i32>,
    user_id: Option<i32>,
) -> Result<(), ServiceError> {
    MaterialEntity::update_many()
        .col_expr(
            material::Column::Quantity,
            Expr::col(material::Column::Quantity).add(delta),
        )
        .filter(material::Column::Id.eq(material_id))
        .exec(conn)
        .await?;

    material_move::ActiveModel {
        material_id: Set(material_id),
        delta: Set(delta),
        reason: Set(Some(reason.to_string())),
        order_id: Set(order_id),
        user_id: Set(user_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplex_sheets_count_both_passes() {
        assert_eq!(clicks_for(100, 1), 200);
        assert_eq!(clicks_for(100, 2), 400);
        assert_eq!(clicks_for(0, 2), 0);
        // defensive clamping
        assert_eq!(clicks_for(-5, 1), 0);
        assert_eq!(clicks_for(10, 0), 20);
    }

    #[test]
    fn min_quantity_floor_blocks_deduction() {
        // 100 in stock, floor 10: taking 95 leaves 5 < 10
        assert!(violates_min(100.0, 95.0, Some(10.0)));
        // taking 50 leaves 50 >= 10
        assert!(!violates_min(100.0, 50.0, Some(10.0)));
        // exact floor is allowed
        assert!(!violates_min(100.0, 90.0, Some(10.0)));
    }

    #[test]
    fn unset_floor_never_blocks() {
        assert!(!violates_min(1.0, 1000.0, None));
        assert!(!violates_min(0.0, 0.5, None));
    }

    #[test]
    fn description_is_read_from_params() {
        let params = serde_json::json!({ "description": "Flyers A6, 4+0" });
        assert_eq!(description_of(&params), Some("Flyers A6, 4+0"));
        assert_eq!(description_of(&serde_json::json!({})), None);
        assert_eq!(description_of(&serde_json::json!({ "description": 3 })), None);
    }
}
