//! API endpoint modules.

pub mod apps;
pub mod auth;
pub mod device_tokens;
pub mod e2e_manual_runs;
pub mod e2e_reports;
pub mod health;
pub mod notifications;
pub mod openapi;
pub mod pull_requests;
pub mod todos;
pub mod websocket;

use actix_web::web;

use crate::error::AppError;

pub use health::configure_health_routes;
pub use openapi::ApiDoc;

/// Register every route that lives under the `/api` scope.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_health_routes)
        .configure(auth::configure_routes)
        .configure(todos::configure_routes)
        .configure(notifications::configure_routes)
        .configure(apps::configure_routes)
        .configure(pull_requests::configure_routes)
        .configure(device_tokens::configure_routes)
        .configure(e2e_reports::configure_routes)
        .configure(e2e_manual_runs::configure_routes)
        .configure(websocket::configure_routes);
}

/// Turn JSON body, path and query extraction failures into validation errors.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(256 * 1024)
            .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    );
}
