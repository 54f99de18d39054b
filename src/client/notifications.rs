//! Notification endpoints.

use futures_util::future::join_all;
use reqwest::Method;

use super::{ClientError, DashboardClient, query_string};
use crate::models::{
    BulkActionResponse, BulkNotificationRequest, CreateNotificationRequest,
    ListNotificationsQuery, Notification, NotificationListResponse,
};

/// Result of one request issued by [`DashboardClient::mark_read_each`].
#[derive(Debug)]
pub struct MarkReadOutcome {
    pub id: i32,
    pub result: Result<Notification, ClientError>,
}

impl DashboardClient {
    pub async fn list_notifications(
        &self,
        query: &ListNotificationsQuery,
    ) -> Result<NotificationListResponse, ClientError> {
        let qs = query_string(&[
            ("unreadOnly", query.unread_only.map(|v| v.to_string())),
            ("limit", query.limit.map(|v| v.to_string())),
        ]);
        self.send(self.request(Method::GET, &format!("/notifications{}", qs)))
            .await
    }

    pub async fn create_notification(
        &self,
        req: &CreateNotificationRequest,
    ) -> Result<Notification, ClientError> {
        self.send(self.request(Method::POST, "/notifications").json(req))
            .await
    }

    pub async fn mark_notification_read(&self, id: i32) -> Result<Notification, ClientError> {
        self.send(self.request(Method::PATCH, &format!("/notifications/{}/read", id)))
            .await
    }

    pub async fn delete_notification(&self, id: i32) -> Result<(), ClientError> {
        self.send_empty(self.request(Method::DELETE, &format!("/notifications/{}", id)))
            .await
    }

    /// Mark `ids` read in one transaction, or every notification when `None`.
    pub async fn mark_all_read(
        &self,
        ids: Option<Vec<i32>>,
    ) -> Result<BulkActionResponse, ClientError> {
        let body = BulkNotificationRequest { ids };
        self.send(
            self.request(Method::PATCH, "/notifications/read-all")
                .json(&body),
        )
        .await
    }

    /// Delete `ids` in one transaction, or every notification when `None`.
    pub async fn delete_all_notifications(
        &self,
        ids: Option<Vec<i32>>,
    ) -> Result<BulkActionResponse, ClientError> {
        let body = BulkNotificationRequest { ids };
        self.send(self.request(Method::DELETE, "/notifications").json(&body))
            .await
    }

    /// Issue one mark-read request per id concurrently and wait for all of
    /// them. Failures are reported per id; successful updates stay applied.
    pub async fn mark_read_each(&self, ids: &[i32]) -> Vec<MarkReadOutcome> {
        join_all(ids.iter().map(|&id| async move {
            MarkReadOutcome {
                id,
                result: self.mark_notification_read(id).await,
            }
        }))
        .await
    }
}
