//! SeaORM entity definitions for PostgreSQL database.

pub mod app;
pub mod device_token;
pub mod e2e_manual_run;
pub mod e2e_report_detail;
pub mod e2e_report_summary;
pub mod notification;
pub mod pull_request;
pub mod todo;
