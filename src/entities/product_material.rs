use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recipe row: how much of one material a single unit of a catalog item
/// consumes. Keyed by the preset (category, description) pair.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_materials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub preset_category: String,
    pub preset_description: String,
    pub material_id: i32,
    pub qty_per_item: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::material::Entity",
        from = "Column::MaterialId",
        to = "super::material::Column::Id",
        on_delete = "Cascade"
    )]
    Material,
}

impl Related<super::material::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Material.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
