//! App entity for SeaORM.

use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "apps")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub code: String,
    pub pipeline_url: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub e2e_trigger_configuration: JsonValue,
    /// Included in automated E2E reporting
    pub watching: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::e2e_manual_run::Entity")]
    ManualRuns,
    #[sea_orm(has_many = "super::e2e_report_detail::Entity")]
    ReportDetails,
}

impl Related<super::e2e_manual_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ManualRuns.def()
    }
}

impl Related<super::e2e_report_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReportDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
