//! Periodic jobs run by the `my-dashboard-scheduler` binary.
//!
//! Each job gets its own task and interval. A job never overlaps with
//! itself: the next tick is only awaited once the previous run finished,
//! and ticks missed meanwhile are skipped.

pub mod github;
pub mod jobs;
pub mod retry;

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::client::{ClientError, DashboardClient};
use crate::config::{ReportMode, SchedulerConfig};
use crate::error::AppError;
use crate::services::PubSub;

use self::github::{GitHubClient, GitHubError};
use self::retry::RetryPolicy;

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("Failed to build API client: {0}")]
    Client(#[from] ClientError),
    #[error("Failed to build GitHub client: {0}")]
    GitHub(#[from] GitHubError),
    #[error("Failed to set up pub/sub: {0}")]
    PubSub(#[from] AppError),
}

/// Running set of periodic jobs.
pub struct Scheduler {
    shutdown: watch::Sender<bool>,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            shutdown,
            tasks: Vec::new(),
        }
    }

    /// Run `job` every `period`, starting immediately.
    pub fn every<F, Fut>(&mut self, name: &'static str, period: Duration, mut job: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut shutdown = self.shutdown.subscribe();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(job = name, interval_secs = period.as_secs(), "Job scheduled");

            loop {
                tokio::select! {
                    _ = shutdown.changed() => break,
                    _ = ticker.tick() => {}
                }

                debug!(job = name, "Job started");
                tokio::select! {
                    _ = shutdown.changed() => {
                        warn!(job = name, "Job cancelled by shutdown");
                        break;
                    }
                    _ = job() => {}
                }
            }
        });
        self.tasks.push((name, task));
    }

    pub fn job_names(&self) -> Vec<&'static str> {
        self.tasks.iter().map(|(name, _)| *name).collect()
    }

    /// Signal every job and wait for the tasks to end.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for (name, task) in self.tasks {
            if let Err(e) = task.await {
                warn!(job = name, error = %e, "Job task ended abnormally");
            }
        }
    }
}

/// Register the jobs enabled by `config`.
pub fn start(config: &SchedulerConfig) -> Result<Scheduler, SchedulerError> {
    let client = DashboardClient::new(config.api_url.clone(), config.api_key.clone())?;
    let mut scheduler = Scheduler::new();

    match config.report_mode {
        ReportMode::PubSub => {
            let pubsub = PubSub::new(&config.redis_url)?;
            scheduler.every("report_publisher", config.report_interval, move || {
                let pubsub = pubsub.clone();
                async move { jobs::report_publisher(&pubsub).await }
            });
        }
        ReportMode::Direct => {
            let client = client.clone();
            scheduler.every("report_generator", config.report_interval, move || {
                let client = client.clone();
                async move { jobs::report_generator(&client, RetryPolicy::REPORT_GENERATION).await }
            });
        }
    }

    match config.github_token.clone() {
        Some(token) => {
            let github = GitHubClient::new(&config.github_api_url, token)?;
            scheduler.every("pr_approval_check", config.pr_check_interval, move || {
                let client = client.clone();
                let github = github.clone();
                async move { jobs::pr_approval_check(&client, &github).await }
            });
        }
        None => info!("GITHUB_TOKEN not set, pull request approval check disabled"),
    }

    Ok(scheduler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_job_runs_until_shutdown() {
        let runs = Arc::new(AtomicU32::new(0));
        let mut scheduler = Scheduler::new();
        let counter = runs.clone();
        scheduler.every("count", Duration::from_millis(10), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        assert_eq!(scheduler.job_names(), vec!["count"]);

        tokio::time::sleep(Duration::from_millis(60)).await;
        scheduler.shutdown().await;

        let after_shutdown = runs.load(Ordering::SeqCst);
        assert!(after_shutdown >= 1);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(runs.load(Ordering::SeqCst), after_shutdown);
    }

    #[tokio::test]
    async fn test_job_never_overlaps_itself() {
        let active = Arc::new(AtomicU32::new(0));
        let max_active = Arc::new(AtomicU32::new(0));
        let mut scheduler = Scheduler::new();
        let (a, m) = (active.clone(), max_active.clone());
        scheduler.every("slow", Duration::from_millis(5), move || {
            let (a, m) = (a.clone(), m.clone());
            async move {
                let now = a.fetch_add(1, Ordering::SeqCst) + 1;
                m.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                a.fetch_sub(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(80)).await;
        scheduler.shutdown().await;
        assert_eq!(max_active.load(Ordering::SeqCst), 1);
    }
}
