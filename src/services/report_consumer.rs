//! Background consumer of report generation requests.
//!
//! Subscribes to the report channel and regenerates one report per message,
//! in arrival order. Resubscribes after a delay when the subscription drops.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::db::DbPool;
use crate::models::WsEvent;
use crate::services::e2e_report::generate_report;
use crate::services::event_broadcaster::EventBroadcaster;
use crate::services::pubsub::{PubSub, REPORT_GENERATE_CHANNEL, parse_report_request};

/// Delay before resubscribing after the subscription is lost.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Handle to a running consumer.
pub struct ReportConsumer {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReportConsumer {
    /// Stop the consumer and wait for the message in flight, if any.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!(error = %e, "Report consumer task ended abnormally");
        }
        info!("Report consumer stopped");
    }
}

/// Spawn the consumer task.
pub fn start_report_consumer(
    pool: DbPool,
    pubsub: PubSub,
    broadcaster: EventBroadcaster,
) -> ReportConsumer {
    let (shutdown, rx) = watch::channel(false);
    let task = tokio::spawn(run(pool, pubsub, broadcaster, rx));
    ReportConsumer { shutdown, task }
}

async fn run(
    pool: DbPool,
    pubsub: PubSub,
    broadcaster: EventBroadcaster,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let subscription = tokio::select! {
            _ = shutdown.changed() => return,
            s = pubsub.subscribe(REPORT_GENERATE_CHANNEL) => s,
        };

        match subscription {
            Ok(stream) => {
                info!(channel = REPORT_GENERATE_CHANNEL, "Report consumer subscribed");
                tokio::pin!(stream);

                loop {
                    tokio::select! {
                        _ = shutdown.changed() => return,
                        msg = stream.next() => match msg {
                            Some(payload) => handle_message(&pool, &broadcaster, &payload).await,
                            None => {
                                warn!(channel = REPORT_GENERATE_CHANNEL, "Report subscription lost");
                                break;
                            }
                        },
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to subscribe to report channel");
            }
        }

        tokio::select! {
            _ = shutdown.changed() => return,
            _ = tokio::time::sleep(RECONNECT_DELAY) => {}
        }
    }
}

/// Process one raw message. Invalid payloads are logged and skipped.
pub async fn handle_message(pool: &DbPool, broadcaster: &EventBroadcaster, payload: &str) {
    let req = match parse_report_request(payload) {
        Ok(req) => req,
        Err(e) => {
            warn!(error = %e, "Skipping invalid report request");
            return;
        }
    };

    info!(date = %req.date, request_id = %req.request_id, "Report generation requested");

    match generate_report(pool, req.date, true, Some(&req.request_id)).await {
        Ok(report) => {
            broadcaster.publish(WsEvent::report_updated(
                &report.summary,
                Some(req.request_id.clone()),
            ));
        }
        Err(e) => {
            error!(
                date = %req.date,
                request_id = %req.request_id,
                error = %e,
                "Report generation failed"
            );
        }
    }
}
