//! HTTP API test suite.
//!
//! Tests that never reach the database run against a lazily-connected pool.
//! Tests marked `#[ignore]` need PostgreSQL (`DATABASE_URL`, e.g.
//! docker compose up -d postgres) and run with:
//!
//! cargo test --test api -- --ignored

mod test_helpers;

mod test_auth;
mod test_e2e_reports;
mod test_manual_runs;
mod test_notifications;
mod test_resources;
mod test_validation;
