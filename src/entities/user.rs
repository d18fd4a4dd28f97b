use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// sha256 hex digest of the password
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Opaque bearer token presented in the Authorization header
    #[sea_orm(unique)]
    #[serde(skip_serializing)]
    pub api_token: String,
    /// "admin" or "manager"
    pub role: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::daily_report::Entity")]
    DailyReports,
}

impl Related<super::daily_report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyReports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
