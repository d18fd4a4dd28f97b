use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A consumable stock item (paper, laminate film, ...). `quantity` is the
/// live stock level; every change to it is mirrored by a material_moves row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[schema(as = Material)]
#[sea_orm(table_name = "materials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub unit: String,
    pub quantity: f64,
    /// Reorder floor; deductions must not take quantity below this
    pub min_quantity: Option<f64>,
    pub sheet_price_single: Option<Decimal>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::material_move::Entity")]
    Moves,
}

impl Related<super::material_move::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Moves.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
