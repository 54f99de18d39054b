//! Scheduled job bodies.

use tracing::{error, info, warn};

use super::github::{GitHubClient, GitHubError, count_approvals};
use super::retry::RetryPolicy;
use crate::client::{ClientError, DashboardClient};
use crate::models::{
    CreateNotificationRequest, ListPullRequestsQuery, NotificationType, PullRequest,
    PullRequestState, ReportGenerationRequest, UpdatePullRequestRequest,
};
use crate::services::PubSub;

/// Publish a generation request for today. Failures are logged only; the
/// next tick tries again.
pub async fn report_publisher(pubsub: &PubSub) {
    let req = ReportGenerationRequest::for_today();
    match pubsub.publish_report_request(&req).await {
        Ok(receivers) => info!(
            job = "report_publisher",
            date = %req.date,
            request_id = %req.request_id,
            receivers,
            "Published report generation request"
        ),
        Err(e) => error!(
            job = "report_publisher",
            date = %req.date,
            request_id = %req.request_id,
            error = %e,
            "Failed to publish report generation request"
        ),
    }
}

/// Force a recompute of today's report through the API, retrying per
/// `policy`.
pub async fn report_generator(client: &DashboardClient, policy: RetryPolicy) {
    let result = policy
        .run("report_generator", || client.get_report(None, true))
        .await;

    match result {
        Ok(report) => info!(
            job = "report_generator",
            date = %report.summary.date,
            status = %report.summary.status.as_str(),
            total_runs = report.summary.total_runs,
            apps = report.details.len(),
            "Report generated"
        ),
        Err(e) => error!(
            job = "report_generator",
            attempts = policy.max_attempts(),
            error = %e,
            "Report generation failed"
        ),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PrCheckError {
    #[error(transparent)]
    GitHub(#[from] GitHubError),
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Changes to apply to a tracked pull request after looking at GitHub.
#[derive(Debug, Clone, PartialEq)]
pub struct PrChange {
    pub update: UpdatePullRequestRequest,
    pub newly_approved: bool,
}

/// Compare the tracked row with GitHub. `None` when nothing changed.
pub fn plan_change(pr: &PullRequest, remote: PullRequestState, approvals: i32) -> Option<PrChange> {
    let approved = approvals > 0;
    let mut update = UpdatePullRequestRequest::default();

    if remote != pr.state {
        update.state = Some(remote);
    }
    if approved != pr.approved {
        update.approved = Some(approved);
    }
    if approvals != pr.approvals_count {
        update.approvals_count = Some(approvals);
    }

    if update.state.is_none() && update.approved.is_none() && update.approvals_count.is_none() {
        return None;
    }

    Some(PrChange {
        update,
        newly_approved: approved && !pr.approved,
    })
}

pub fn approval_notification(pr: &PullRequest) -> CreateNotificationRequest {
    CreateNotificationRequest {
        title: "Pull request approved".to_string(),
        message: format!("{}#{} {} was approved", pr.repository, pr.number, pr.title),
        notification_type: Some(NotificationType::Success.as_str().to_string()),
        link: Some(pr.url.clone()),
    }
}

async fn check_pull_request(
    client: &DashboardClient,
    github: &GitHubClient,
    pr: &PullRequest,
) -> Result<bool, PrCheckError> {
    let remote = github.pull_request(&pr.repository, pr.number).await?;
    let reviews = github.reviews(&pr.repository, pr.number).await?;

    let Some(change) = plan_change(pr, remote.dashboard_state(), count_approvals(&reviews)) else {
        return Ok(false);
    };

    client.update_pull_request(pr.id, &change.update).await?;
    if change.newly_approved {
        client
            .create_notification(&approval_notification(pr))
            .await?;
        info!(
            job = "pr_approval_check",
            repository = %pr.repository,
            number = pr.number,
            "Pull request approved"
        );
    }
    Ok(true)
}

/// Sync approval and state of every open pull request with GitHub.
pub async fn pr_approval_check(client: &DashboardClient, github: &GitHubClient) {
    let query = ListPullRequestsQuery {
        state: Some(PullRequestState::Open),
    };
    let prs = match client.list_pull_requests(&query).await {
        Ok(prs) => prs,
        Err(e) => {
            error!(job = "pr_approval_check", error = %e, "Failed to list pull requests");
            return;
        }
    };

    let mut updated = 0;
    for pr in &prs {
        match check_pull_request(client, github, pr).await {
            Ok(true) => updated += 1,
            Ok(false) => {}
            Err(e) => warn!(
                job = "pr_approval_check",
                repository = %pr.repository,
                number = pr.number,
                error = %e,
                "Failed to check pull request"
            ),
        }
    }

    info!(job = "pr_approval_check", checked = prs.len(), updated, "Pull request check finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn pr(state: PullRequestState, approved: bool, approvals_count: i32) -> PullRequest {
        PullRequest {
            id: 1,
            repository: "mattermost/my-dashboard".to_string(),
            number: 42,
            title: "Add report view".to_string(),
            author: None,
            url: "https://github.com/mattermost/my-dashboard/pull/42".to_string(),
            state,
            approved,
            approvals_count,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_unchanged_pull_request_needs_no_update() {
        let current = pr(PullRequestState::Open, false, 0);
        assert_eq!(plan_change(&current, PullRequestState::Open, 0), None);
    }

    #[test]
    fn test_first_approval_is_newly_approved() {
        let current = pr(PullRequestState::Open, false, 0);
        let change = plan_change(&current, PullRequestState::Open, 2).unwrap();
        assert!(change.newly_approved);
        assert_eq!(change.update.approved, Some(true));
        assert_eq!(change.update.approvals_count, Some(2));
        assert_eq!(change.update.state, None);
    }

    #[test]
    fn test_extra_approval_is_not_newly_approved() {
        let current = pr(PullRequestState::Open, true, 1);
        let change = plan_change(&current, PullRequestState::Open, 2).unwrap();
        assert!(!change.newly_approved);
        assert_eq!(change.update.approved, None);
    }

    #[test]
    fn test_merge_updates_state() {
        let current = pr(PullRequestState::Open, true, 1);
        let change = plan_change(&current, PullRequestState::Merged, 1).unwrap();
        assert_eq!(change.update.state, Some(PullRequestState::Merged));
        assert!(!change.newly_approved);
    }

    #[test]
    fn test_approval_notification_links_to_pull_request() {
        let n = approval_notification(&pr(PullRequestState::Open, false, 0));
        assert_eq!(n.notification_type.as_deref(), Some("success"));
        assert_eq!(
            n.link.as_deref(),
            Some("https://github.com/mattermost/my-dashboard/pull/42")
        );
        assert!(n.message.contains("#42"));
    }
}
