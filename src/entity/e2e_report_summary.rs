//! E2E report summary entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "e2e_report_summaries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub date: Date,
    /// pending, ready, failed
    pub status: String,
    pub total_runs: i32,
    pub passed_runs: i32,
    pub failed_runs: i32,
    pub success_rate: f64,
    /// Request that last regenerated this summary
    pub last_request_id: Option<String>,
    pub generated_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::e2e_report_detail::Entity")]
    Details,
}

impl Related<super::e2e_report_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Details.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
