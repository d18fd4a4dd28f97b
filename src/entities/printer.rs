use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "printers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::printer_counter::Entity")]
    Counters,
}

impl Related<super::printer_counter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Counters.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
