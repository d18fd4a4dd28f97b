use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An order line item. `params` is free-form JSON and must at least carry a
/// `description`, which together with `item_type` keys the recipe lookup.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub order_id: i32,
    /// Preset category this item was created from
    #[sea_orm(column_name = "type")]
    pub item_type: String,
    /// JSON-encoded attributes (description, extras, explicit components)
    pub params: String,
    /// Price per unit
    pub price: Decimal,
    pub quantity: i32,
    pub printer_id: Option<i32>,
    pub sides: i32,
    pub sheets: i32,
    pub waste: i32,
    /// Derived print-run metric: sheets * sides * 2
    pub clicks: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id",
        on_delete = "Cascade"
    )]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
