//! Pull request entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pull_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// "owner/name"
    pub repository: String,
    pub number: i32,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    /// open, merged, closed
    pub state: String,
    pub approved: bool,
    pub approvals_count: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
