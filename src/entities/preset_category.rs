use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "preset_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub category: String,
    pub color: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::preset_item::Entity")]
    Items,
    #[sea_orm(has_many = "super::preset_extra::Entity")]
    Extras,
}

impl Related<super::preset_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::preset_extra::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Extras.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
