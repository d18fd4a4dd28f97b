use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// End-of-day click counter reading for one printer; upserted per
/// (printer, date).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "printer_counters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub printer_id: i32,
    pub counter_date: NaiveDate,
    pub value: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::printer::Entity",
        from = "Column::PrinterId",
        to = "super::printer::Column::Id",
        on_delete = "Cascade"
    )]
    Printer,
}

impl Related<super::printer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Printer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
