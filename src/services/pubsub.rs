//! Pub/sub client for report generation requests.
//!
//! Wraps a `redis::Client` constructed once at process start. Publishing
//! shares one multiplexed connection, opened on first use. Every
//! subscriber gets its own dedicated connection. Connections close when
//! the last handle is dropped.

use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::models::ReportGenerationRequest;

/// Channel carrying `{date, requestId}` report generation requests.
pub const REPORT_GENERATE_CHANNEL: &str = "e2e:report:generate";

/// Handle to the pub/sub broker. Clones share the publishing connection.
#[derive(Clone)]
pub struct PubSub {
    client: redis::Client,
    publisher: Arc<OnceCell<MultiplexedConnection>>,
}

impl PubSub {
    /// Build a handle for `url` without connecting.
    pub fn new(url: &str) -> AppResult<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| AppError::PubSub(format!("Invalid redis URL: {}", e)))?;
        Ok(Self {
            client,
            publisher: Arc::new(OnceCell::new()),
        })
    }

    /// Build a handle and open the publishing connection right away.
    pub async fn connect(url: &str) -> AppResult<Self> {
        let pubsub = Self::new(url)?;
        pubsub.publisher().await?;
        Ok(pubsub)
    }

    async fn publisher(&self) -> AppResult<MultiplexedConnection> {
        let conn = self
            .publisher
            .get_or_try_init(|| async {
                self.client
                    .get_multiplexed_async_connection()
                    .await
                    .map_err(|e| AppError::PubSub(format!("Failed to connect to redis: {}", e)))
            })
            .await?;
        Ok(conn.clone())
    }

    /// Round-trip a PING on the publishing connection.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.publisher().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    /// Publish a raw payload. Returns the number of subscribers that got it.
    pub async fn publish(&self, channel: &str, payload: &str) -> AppResult<i64> {
        let mut conn = self.publisher().await?;
        let receivers: i64 = conn.publish(channel, payload).await?;
        debug!(channel = %channel, receivers, "Published message");
        Ok(receivers)
    }

    /// Publish a report generation request on [`REPORT_GENERATE_CHANNEL`].
    pub async fn publish_report_request(&self, req: &ReportGenerationRequest) -> AppResult<i64> {
        let payload = serde_json::to_string(req)
            .map_err(|e| AppError::Internal(format!("Failed to encode request: {}", e)))?;
        self.publish(REPORT_GENERATE_CHANNEL, &payload).await
    }

    /// Subscribe to `channel` on a dedicated connection.
    ///
    /// The stream ends when the connection drops.
    pub async fn subscribe(&self, channel: &str) -> AppResult<impl Stream<Item = String> + use<>> {
        let mut pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(|e| AppError::PubSub(format!("Failed to open subscription: {}", e)))?;
        pubsub.subscribe(channel).await?;

        Ok(pubsub.into_on_message().filter_map(|msg| async move {
            match msg.get_payload::<String>() {
                Ok(payload) => Some(payload),
                Err(e) => {
                    warn!(error = %e, "Dropping non-text pub/sub payload");
                    None
                }
            }
        }))
    }
}

/// Decode a report generation request received on the channel.
pub fn parse_report_request(payload: &str) -> AppResult<ReportGenerationRequest> {
    serde_json::from_str(payload)
        .map_err(|e| AppError::Validation(format!("Invalid report request payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_report_request() {
        let req = parse_report_request(r#"{"date":"2025-10-02","requestId":"abc"}"#).unwrap();
        assert_eq!(req.date, NaiveDate::from_ymd_opt(2025, 10, 2).unwrap());
        assert_eq!(req.request_id, "abc");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_report_request("not json").is_err());
        assert!(parse_report_request(r#"{"date":"2025-10-02"}"#).is_err());
    }

    #[test]
    fn test_new_does_not_connect() {
        assert!(PubSub::new("redis://127.0.0.1:1/").is_ok());
        assert!(PubSub::new("not a url").is_err());
    }
}
