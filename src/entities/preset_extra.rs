use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "preset_extras")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    pub price: Decimal,
    /// Input kind rendered by the client ("checkbox", "number", ...)
    #[sea_orm(column_name = "type")]
    pub extra_type: String,
    pub unit: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::preset_category::Entity",
        from = "Column::CategoryId",
        to = "super::preset_category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<super::preset_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
