//! Minimal GitHub REST client for pull request state and reviews.

use std::collections::HashMap;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::models::PullRequestState;

const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = "my-dashboard-scheduler";

#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub returned {status} for {path}")]
    Status { status: u16, path: String },

    #[error("Invalid repository '{0}': expected owner/name")]
    InvalidRepository(String),
}

/// Subset of `GET /repos/{owner}/{repo}/pulls/{number}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PullDetails {
    pub state: String,
    #[serde(default)]
    pub merged: bool,
}

impl PullDetails {
    pub fn dashboard_state(&self) -> PullRequestState {
        if self.merged {
            PullRequestState::Merged
        } else if self.state == "closed" {
            PullRequestState::Closed
        } else {
            PullRequestState::Open
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewUser {
    pub login: String,
}

/// Subset of a review from `GET /repos/{owner}/{repo}/pulls/{number}/reviews`.
#[derive(Debug, Clone, Deserialize)]
pub struct Review {
    pub user: Option<ReviewUser>,
    pub state: String,
}

/// Number of reviewers whose latest decisive review is an approval.
///
/// Reviews arrive oldest first. Comment-only reviews do not override an
/// earlier approval or change request.
pub fn count_approvals(reviews: &[Review]) -> i32 {
    let mut latest: HashMap<&str, &str> = HashMap::new();
    for review in reviews {
        let Some(user) = review.user.as_ref() else {
            continue;
        };
        match review.state.as_str() {
            "APPROVED" | "CHANGES_REQUESTED" | "DISMISSED" => {
                latest.insert(user.login.as_str(), review.state.as_str());
            }
            _ => {}
        }
    }
    latest.values().filter(|s| **s == "APPROVED").count() as i32
}

/// Split `owner/name`.
pub fn split_repository(repository: &str) -> Result<(&str, &str), GitHubError> {
    match repository.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner, name))
        }
        _ => Err(GitHubError::InvalidRepository(repository.to_string())),
    }
}

#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: SecretString,
}

impl GitHubClient {
    pub fn new(api_url: &str, token: SecretString) -> Result<Self, GitHubError> {
        let http = reqwest::Client::builder()
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GitHubError> {
        let resp = self
            .http
            .get(format!("{}{}", self.api_url, path))
            .header("Accept", "application/vnd.github+json")
            .header(
                "Authorization",
                format!("Bearer {}", self.token.expose_secret()),
            )
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(GitHubError::Status {
                status: resp.status().as_u16(),
                path: path.to_string(),
            });
        }
        Ok(resp.json().await?)
    }

    pub async fn pull_request(
        &self,
        repository: &str,
        number: i32,
    ) -> Result<PullDetails, GitHubError> {
        let (owner, name) = split_repository(repository)?;
        self.get(&format!("/repos/{}/{}/pulls/{}", owner, name, number))
            .await
    }

    pub async fn reviews(&self, repository: &str, number: i32) -> Result<Vec<Review>, GitHubError> {
        let (owner, name) = split_repository(repository)?;
        self.get(&format!(
            "/repos/{}/{}/pulls/{}/reviews?per_page=100",
            owner, name, number
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(login: &str, state: &str) -> Review {
        Review {
            user: Some(ReviewUser {
                login: login.to_string(),
            }),
            state: state.to_string(),
        }
    }

    #[test]
    fn test_count_approvals_uses_latest_decision() {
        let reviews = vec![
            review("alice", "APPROVED"),
            review("bob", "APPROVED"),
            review("bob", "CHANGES_REQUESTED"),
            review("alice", "COMMENTED"),
            review("carol", "COMMENTED"),
        ];
        assert_eq!(count_approvals(&reviews), 1);
        assert_eq!(count_approvals(&[]), 0);
    }

    #[test]
    fn test_dashboard_state() {
        let merged = PullDetails {
            state: "closed".to_string(),
            merged: true,
        };
        let closed = PullDetails {
            state: "closed".to_string(),
            merged: false,
        };
        let open = PullDetails {
            state: "open".to_string(),
            merged: false,
        };
        assert_eq!(merged.dashboard_state(), PullRequestState::Merged);
        assert_eq!(closed.dashboard_state(), PullRequestState::Closed);
        assert_eq!(open.dashboard_state(), PullRequestState::Open);
    }

    #[test]
    fn test_split_repository() {
        assert_eq!(
            split_repository("mattermost/my-dashboard").unwrap(),
            ("mattermost", "my-dashboard")
        );
        assert!(split_repository("no-slash").is_err());
        assert!(split_repository("a/b/c").is_err());
        assert!(split_repository("/b").is_err());
    }
}
