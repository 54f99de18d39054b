//! Liveness and readiness probes. Both are public.

use actix_web::{HttpResponse, get, web};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::services::PubSub;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: String,
}

/// Per-dependency readiness.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadyResponse {
    /// ready or not_ready
    status: &'static str,
    database: &'static str,
    pubsub: &'static str,
}

fn state(ok: bool) -> &'static str {
    if ok { "connected" } else { "unavailable" }
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Process is up", body = HealthResponse)
    )
)]
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Returns 200 only when the database and the pub/sub broker both answer.
#[utoipa::path(
    get,
    path = "/api/ready",
    tag = "Health",
    responses(
        (status = 200, description = "All dependencies reachable", body = ReadyResponse),
        (status = 503, description = "A dependency is unreachable", body = ReadyResponse)
    )
)]
#[get("/ready")]
pub async fn ready(pool: web::Data<DbPool>, pubsub: web::Data<PubSub>) -> HttpResponse {
    let (db, broker) = tokio::join!(pool.ping(), pubsub.ping());

    if let Err(ref e) = db {
        warn!(error = %e, "Readiness check: database unreachable");
    }
    if let Err(ref e) = broker {
        warn!(error = %e, "Readiness check: pub/sub unreachable");
    }

    let ok = db.is_ok() && broker.is_ok();
    let body = ReadyResponse {
        status: if ok { "ready" } else { "not_ready" },
        database: state(db.is_ok()),
        pubsub: state(broker.is_ok()),
    };

    if ok {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(ready);
}
