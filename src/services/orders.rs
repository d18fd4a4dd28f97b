use crate::{
    entities::item::{self, Entity as ItemEntity},
    entities::order::{self, ActiveModel as OrderActiveModel, Entity as OrderEntity},
    entities::order_status::{self, Entity as OrderStatusEntity},
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

/// Wire representation of an order line item. Field names match the
/// browser client's expectations.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: i32,
    pub order_id: i32,
    #[serde(rename = "type")]
    pub item_type: String,
    #[schema(value_type = Object)]
    pub params: Value,
    pub price: Decimal,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub printer_id: Option<i32>,
    pub sides: i32,
    pub sheets: i32,
    pub waste: i32,
    pub clicks: i32,
}

impl ItemResponse {
    pub fn from_model(model: item::Model) -> Self {
        // Stored params are written by this service, but decode defensively:
        // a corrupt row must not take the whole order listing down.
        let params = serde_json::from_str(&model.params)
            .unwrap_or_else(|_| serde_json::json!({ "description": "Invalid data" }));
        Self {
            id: model.id,
            order_id: model.order_id,
            item_type: model.item_type,
            params,
            price: model.price,
            quantity: model.quantity.max(1),
            printer_id: model.printer_id,
            sides: model.sides,
            sheets: model.sheets,
            waste: model.waste,
            clicks: model.clicks,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i32,
    pub number: Option<String>,
    pub status: i32,
    pub created_at: DateTime<Utc>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub prepayment_amount: Decimal,
    pub prepayment_status: Option<String>,
    pub payment_url: Option<String>,
    pub payment_id: Option<String>,
    pub user_id: Option<i32>,
    pub items: Vec<ItemResponse>,
}

impl OrderResponse {
    pub fn from_model(model: order::Model, items: Vec<item::Model>) -> Self {
        Self {
            id: model.id,
            number: model.number,
            status: model.status,
            created_at: model.created_at,
            customer_name: model.customer_name,
            customer_phone: model.customer_phone,
            customer_email: model.customer_email,
            prepayment_amount: model.prepayment_amount,
            prepayment_status: model.prepayment_status,
            payment_url: model.payment_url,
            payment_id: model.payment_id,
            user_id: model.user_id,
            items: items.into_iter().map(ItemResponse::from_model).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub prepayment_amount: Option<Decimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePrepaymentRequest {
    pub amount: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentWebhookRequest {
    pub payment_id: Option<String>,
    pub status: Option<String>,
    #[allow(dead_code)]
    pub order_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NormalizePricesResponse {
    #[serde(rename = "orderId")]
    pub order_id: i32,
    pub updated: u32,
}

/// Service for order lifecycle operations. Inventory-affecting item
/// operations live in `order_items::OrderItemService`.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
}

impl OrderService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists the caller's orders plus unowned ones, newest first, with
    /// their items embedded.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, user_id: i32) -> Result<Vec<OrderResponse>, ServiceError> {
        let db = &*self.db;

        let orders = OrderEntity::find()
            .filter(
                Condition::any()
                    .add(order::Column::UserId.eq(user_id))
                    .add(order::Column::UserId.is_null()),
            )
            .order_by_desc(order::Column::Id)
            .all(db)
            .await?;

        let mut responses = Vec::with_capacity(orders.len());
        for order_model in orders {
            let items = ItemEntity::find()
                .filter(item::Column::OrderId.eq(order_model.id))
                .all(db)
                .await?;
            responses.push(OrderResponse::from_model(order_model, items));
        }

        Ok(responses)
    }

    /// Creates an empty order (status 1) and assigns its formatted number
    /// from the freshly inserted id.
    #[instrument(skip(self, request))]
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
        user_id: Option<i32>,
    ) -> Result<OrderResponse, ServiceError> {
        let txn = self.db.begin().await?;

        let inserted = OrderActiveModel {
            status: Set(1),
            created_at: Set(Utc::now()),
            customer_name: Set(request.customer_name),
            customer_phone: Set(request.customer_phone),
            customer_email: Set(request.customer_email),
            prepayment_amount: Set(request.prepayment_amount.unwrap_or_default()),
            user_id: Set(user_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let number = format!("ORD-{:04}", inserted.id);
        let mut active: OrderActiveModel = inserted.into();
        active.number = Set(Some(number.clone()));
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        info!(order_id = updated.id, number = %number, "order created");
        Ok(OrderResponse::from_model(updated, Vec::new()))
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: i32) -> Result<Option<order::Model>, ServiceError> {
        Ok(OrderEntity::find_by_id(order_id).one(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        order_id: i32,
        status: i32,
    ) -> Result<OrderResponse, ServiceError> {
        let order_model = OrderEntity::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;

        let mut active: OrderActiveModel = order_model.into();
        active.status = Set(status);
        let updated = active.update(&*self.db).await?;

        info!(order_id, status, "order status updated");
        Ok(OrderResponse::from_model(updated, Vec::new()))
    }

    /// Creates a prepayment link through the (stubbed) payment provider
    /// and records the pending payment on the order.
    #[instrument(skip(self))]
    pub async fn create_prepayment(
        &self,
        order_id: i32,
        amount: Option<Decimal>,
    ) -> Result<OrderResponse, ServiceError> {
        let order_model = OrderEntity::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;

        let amount = amount.unwrap_or(order_model.prepayment_amount);
        if amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Prepayment amount is not set".to_string(),
            ));
        }

        let payment_id = format!("BEP-{}-{}", Utc::now().timestamp_millis(), order_id);
        let payment_url = format!("https://checkout.bepaid.by/redirect/{payment_id}");

        let mut active: OrderActiveModel = order_model.into();
        active.prepayment_amount = Set(amount);
        active.prepayment_status = Set(Some("pending".to_string()));
        active.payment_url = Set(Some(payment_url));
        active.payment_id = Set(Some(payment_id));
        let updated = active.update(&*self.db).await?;

        Ok(OrderResponse::from_model(updated, Vec::new()))
    }

    /// Applies a payment-provider webhook: sets prepayment status on the
    /// order carrying the given payment id. Unknown ids are ignored.
    #[instrument(skip(self))]
    pub async fn apply_payment_webhook(
        &self,
        payment_id: &str,
        status: &str,
    ) -> Result<(), ServiceError> {
        OrderEntity::update_many()
            .col_expr(
                order::Column::PrepaymentStatus,
                sea_orm::sea_query::Expr::value(status),
            )
            .filter(order::Column::PaymentId.eq(payment_id))
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    /// Copies an order and its items under a derived number. The copy is
    /// bookkeeping only: no materials are deducted for the copied items.
    #[instrument(skip(self))]
    pub async fn duplicate_order(&self, order_id: i32) -> Result<OrderResponse, ServiceError> {
        let original = OrderEntity::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;

        let original_items = ItemEntity::find()
            .filter(item::Column::OrderId.eq(order_id))
            .all(&*self.db)
            .await?;

        let txn = self.db.begin().await?;

        let copy_number = format!(
            "{}-COPY-{}",
            original.number.as_deref().unwrap_or("ORD"),
            Utc::now().timestamp_millis()
        );
        let copy = OrderActiveModel {
            number: Set(Some(copy_number)),
            status: Set(1),
            created_at: Set(Utc::now()),
            customer_name: Set(original.customer_name.clone()),
            customer_phone: Set(original.customer_phone.clone()),
            customer_email: Set(original.customer_email.clone()),
            prepayment_amount: Set(Decimal::ZERO),
            user_id: Set(original.user_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut copied_items = Vec::with_capacity(original_items.len());
        for source in original_items {
            let copied = item::ActiveModel {
                order_id: Set(copy.id),
                item_type: Set(source.item_type.clone()),
                params: Set(source.params.clone()),
                price: Set(source.price),
                quantity: Set(source.quantity),
                printer_id: Set(source.printer_id),
                sides: Set(source.sides),
                sheets: Set(source.sheets),
                waste: Set(source.waste),
                clicks: Set(source.clicks),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            copied_items.push(copied);
        }

        txn.commit().await?;

        info!(source = order_id, copy = copy.id, "order duplicated");
        Ok(OrderResponse::from_model(copy, copied_items))
    }

    /// Rewrites item prices that look like order totals into per-item
    /// prices. Heuristic carried over from the shop's bookkeeping cleanup.
    #[instrument(skip(self))]
    pub async fn normalize_prices(
        &self,
        order_id: i32,
    ) -> Result<NormalizePricesResponse, ServiceError> {
        let items = ItemEntity::find()
            .filter(item::Column::OrderId.eq(order_id))
            .all(&*self.db)
            .await?;

        let mut updated = 0u32;
        for it in items {
            let qty = it.quantity.max(1);
            if let Some(per_item) = normalized_price(it.price, qty) {
                let mut active: item::ActiveModel = it.into();
                active.price = Set(per_item);
                active.update(&*self.db).await?;
                updated += 1;
            }
        }

        Ok(NormalizePricesResponse { order_id, updated })
    }

    #[instrument(skip(self))]
    pub async fn list_statuses(&self) -> Result<Vec<order_status::Model>, ServiceError> {
        Ok(OrderStatusEntity::find()
            .order_by_asc(order_status::Column::SortOrder)
            .all(&*self.db)
            .await?)
    }
}

/// Returns the corrected per-item price when the stored price likely
/// contains the whole-run total: quantity > 1 and the implied per-item
/// price is implausibly high (over 10, or over 3 for runs of 50+).
fn normalized_price(price: Decimal, quantity: i32) -> Option<Decimal> {
    if quantity <= 1 || price <= Decimal::ZERO {
        return None;
    }
    let per_item = price / Decimal::from(quantity);
    let looks_like_total = per_item > Decimal::from(10)
        || (quantity >= 50 && per_item > Decimal::from(3));
    looks_like_total.then(|| per_item.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn per_item_prices_are_left_alone() {
        assert_eq!(normalized_price(dec!(0.08), 500), None);
        assert_eq!(normalized_price(dec!(9.50), 2), None);
        assert_eq!(normalized_price(dec!(30), 1), None);
    }

    #[test]
    fn totals_are_converted_to_per_item() {
        // 500 flyers stored with the full run price of 40.00
        assert_eq!(normalized_price(dec!(40), 500), None); // 0.08/item: plausible
        assert_eq!(normalized_price(dec!(2000), 100), Some(dec!(20)));
        assert_eq!(normalized_price(dec!(400), 50), Some(dec!(8)));
    }

    #[test]
    fn item_params_decode_defensively() {
        let model = item::Model {
            id: 1,
            order_id: 1,
            item_type: "Flyers".into(),
            params: "{not json".into(),
            price: dec!(1),
            quantity: 1,
            printer_id: None,
            sides: 1,
            sheets: 0,
            waste: 0,
            clicks: 0,
        };
        let response = ItemResponse::from_model(model);
        assert_eq!(response.params["description"], "Invalid data");
    }
}
