//! My Dashboard server - main entry point.
//!
//! Starts the Actix-web server, the report consumer and serves the SPA.

use std::path::PathBuf;
use std::time::Duration;

use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::middleware::Condition;
use actix_web::{App, HttpServer, Result as ActixResult, http::header, web};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use my_dashboard_lib::api::{self, ApiDoc};
use my_dashboard_lib::auth::ApiKey;
use my_dashboard_lib::config::{API_KEY_HEADER, Config};
use my_dashboard_lib::db::DbPool;
use my_dashboard_lib::error::AppError;
use my_dashboard_lib::middleware::{RequestLogger, error_details};
use my_dashboard_lib::services::{EventBroadcaster, PubSub, start_report_consumer};

/// SPA fallback handler - serves index.html for client-side routing.
async fn spa_fallback(static_dir: web::Data<PathBuf>) -> ActixResult<NamedFile> {
    Ok(NamedFile::open(static_dir.join("index.html"))?)
}

/// Unknown routes under `/api` get a JSON 404 instead of the SPA.
async fn api_not_found() -> Result<actix_web::HttpResponse, AppError> {
    Err(AppError::NotFound("Endpoint".to_string()))
}

/// Query the running server's health endpoint (for Docker HEALTHCHECK).
async fn health_check() -> bool {
    let Ok(config) = Config::from_env() else {
        return false;
    };
    let host = if config.host == "0.0.0.0" {
        "127.0.0.1"
    } else {
        config.host.as_str()
    };
    let url = format!("http://{}:{}/api/health", host, config.port);

    let Ok(client) = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
    else {
        return false;
    };
    matches!(client.get(url).send().await, Ok(resp) if resp.status().is_success())
}

fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn build_cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .allowed_header(API_KEY_HEADER)
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    // Check for --health-check flag (used by Docker HEALTHCHECK)
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(if health_check().await { 0 } else { 1 });
    }

    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, DATABASE_URL and MD_API_KEY must be set");
            error!("  - In production, values must not match development defaults");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  My Dashboard");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    let pool = match DbPool::new(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };
    info!("Database connection established");

    if let Err(e) = pool.run_migrations().await {
        error!("{}", e);
        std::process::exit(1);
    }

    let pubsub = match PubSub::connect(&config.redis_url).await {
        Ok(pubsub) => pubsub,
        Err(e) => {
            error!("Failed to connect to pub/sub broker: {}", e);
            std::process::exit(1);
        }
    };
    info!("Pub/sub connection established");

    let broadcaster = EventBroadcaster::new();
    let consumer = start_report_consumer(pool.clone(), pubsub.clone(), broadcaster.clone());

    let bind_address = config.bind_address();
    let api_key = ApiKey::new(config.api_key.clone());
    let static_dir = config.static_dir.clone();
    let is_development = config.is_development();
    let cors_origins = config.cors_origins.clone();

    if let Some(ref dir) = static_dir {
        info!("Static file serving enabled from {:?}", dir);
    }

    let worker_count = if is_development { 4 } else { num_cpus::get() };
    info!(
        "Starting server at http://{} ({} workers)",
        bind_address, worker_count
    );

    let server_pool = pool.clone();
    let server = HttpServer::new(move || {
        let mut app = App::new()
            .wrap(Condition::new(is_development, error_details()))
            .wrap(RequestLogger)
            .wrap(build_cors(&cors_origins))
            .app_data(web::Data::new(server_pool.clone()))
            .app_data(web::Data::new(api_key.clone()))
            .app_data(web::Data::new(broadcaster.clone()))
            .app_data(web::Data::new(pubsub.clone()))
            .configure(api::configure_extractors)
            .service(SwaggerUi::new("/api/docs/{_:.*}").url("/api/openapi.json", ApiDoc::openapi()))
            .service(
                web::scope("/api")
                    .configure(api::configure_api)
                    .default_service(web::to(api_not_found)),
            );

        // Serve the SPA build when configured
        if let Some(ref dir) = static_dir {
            app = app
                .app_data(web::Data::new(dir.clone()))
                .service(Files::new("/assets", dir.join("assets")).prefer_utf8(true))
                .service(
                    Files::new("/", dir.clone())
                        .index_file("index.html")
                        .default_handler(web::to(spa_fallback)),
                );
        }

        app
    })
    .workers(worker_count)
    .bind(&bind_address)?
    .run();

    let result = server.await;

    info!("Server stopped, shutting down background tasks");
    consumer.stop().await;
    if let Err(e) = pool.close().await {
        warn!("{}", e);
    }

    result
}
