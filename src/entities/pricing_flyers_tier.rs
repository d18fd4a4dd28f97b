use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Quantity-tiered sheet price for the flyers calculator. The applicable
/// tier is the one with the greatest min_qty not exceeding the requested
/// quantity.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pricing_flyers_tiers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub format: String,
    pub price_type: String,
    pub paper_density: i32,
    pub min_qty: i32,
    pub sheet_price_single: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
