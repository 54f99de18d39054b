//! My Dashboard scheduler - runs periodic report and pull request jobs.

use my_dashboard_lib::config::{ReportMode, SchedulerConfig};
use my_dashboard_lib::scheduler;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        std::process::exit(1);
    }

    let config = match SchedulerConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load scheduler configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        environment = %config.environment,
        api_url = %config.api_url,
        report_mode = match config.report_mode {
            ReportMode::PubSub => "pubsub",
            ReportMode::Direct => "direct",
        },
        "Starting My Dashboard scheduler"
    );

    let jobs = match scheduler::start(&config) {
        Ok(jobs) => jobs,
        Err(e) => {
            error!("Failed to start scheduler: {}", e);
            std::process::exit(1);
        }
    };
    info!(jobs = ?jobs.job_names(), "Scheduler running");

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }

    info!("Shutting down scheduler");
    jobs.shutdown().await;
}
