//! E2E report detail entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "e2e_report_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub report_summary_id: i32,
    pub app_id: i32,
    pub total_runs: i32,
    pub passed_runs: i32,
    pub failed_runs: i32,
    pub success_rate: f64,
    /// none, passed, failed
    pub last_run_status: String,
    pub last_run_at: Option<DateTimeUtc>,
    pub last_failed_run_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::e2e_report_summary::Entity",
        from = "Column::ReportSummaryId",
        to = "super::e2e_report_summary::Column::Id",
        on_delete = "Cascade"
    )]
    Summary,
    #[sea_orm(
        belongs_to = "super::app::Entity",
        from = "Column::AppId",
        to = "super::app::Column::Id",
        on_delete = "Cascade"
    )]
    App,
}

impl Related<super::e2e_report_summary::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Summary.def()
    }
}

impl Related<super::app::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::App.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
