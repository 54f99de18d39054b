//! My Dashboard library.
//!
//! Backend API, E2E report aggregation, pub/sub report consumer, scheduled
//! jobs and the typed client shared by the server and scheduler binaries.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod scheduler;
pub mod services;
