//! Auth, to-do, app, pull request and device token endpoints.

use reqwest::Method;

use super::{ClientError, DashboardClient, query_string};
use crate::models::{
    App, CreateAppRequest, CreatePullRequestRequest, CreateTodoRequest, DeviceToken,
    ListAppsQuery, ListPullRequestsQuery, PullRequest, RegisterDeviceTokenRequest, Todo,
    UpdateAppRequest, UpdatePullRequestRequest, UpdateTodoRequest, ValidateKeyResponse,
};

impl DashboardClient {
    /// Check the configured API key. A rejected key yields `Ok(false)`.
    pub async fn validate_key(&self) -> Result<bool, ClientError> {
        match self
            .send::<ValidateKeyResponse>(self.request(Method::POST, "/auth/validate"))
            .await
        {
            Ok(resp) => Ok(resp.valid),
            Err(e) if e.is_unauthorized() => Ok(false),
            Err(e) => Err(e),
        }
    }

    // To-dos

    pub async fn list_todos(&self) -> Result<Vec<Todo>, ClientError> {
        self.send(self.request(Method::GET, "/to_do_list")).await
    }

    pub async fn get_todo(&self, id: i32) -> Result<Todo, ClientError> {
        self.send(self.request(Method::GET, &format!("/to_do_list/{}", id)))
            .await
    }

    pub async fn create_todo(&self, req: &CreateTodoRequest) -> Result<Todo, ClientError> {
        self.send(self.request(Method::POST, "/to_do_list").json(req))
            .await
    }

    pub async fn update_todo(&self, id: i32, req: &UpdateTodoRequest) -> Result<Todo, ClientError> {
        self.send(
            self.request(Method::PUT, &format!("/to_do_list/{}", id))
                .json(req),
        )
        .await
    }

    pub async fn delete_todo(&self, id: i32) -> Result<(), ClientError> {
        self.send_empty(self.request(Method::DELETE, &format!("/to_do_list/{}", id)))
            .await
    }

    // Apps

    pub async fn list_apps(&self, query: &ListAppsQuery) -> Result<Vec<App>, ClientError> {
        let qs = query_string(&[("watching", query.watching.map(|v| v.to_string()))]);
        self.send(self.request(Method::GET, &format!("/apps{}", qs)))
            .await
    }

    pub async fn get_app(&self, id: i32) -> Result<App, ClientError> {
        self.send(self.request(Method::GET, &format!("/apps/{}", id)))
            .await
    }

    pub async fn create_app(&self, req: &CreateAppRequest) -> Result<App, ClientError> {
        self.send(self.request(Method::POST, "/apps").json(req)).await
    }

    pub async fn update_app(&self, id: i32, req: &UpdateAppRequest) -> Result<App, ClientError> {
        self.send(self.request(Method::PUT, &format!("/apps/{}", id)).json(req))
            .await
    }

    pub async fn delete_app(&self, id: i32) -> Result<(), ClientError> {
        self.send_empty(self.request(Method::DELETE, &format!("/apps/{}", id)))
            .await
    }

    // Pull requests

    pub async fn list_pull_requests(
        &self,
        query: &ListPullRequestsQuery,
    ) -> Result<Vec<PullRequest>, ClientError> {
        let qs = query_string(&[("state", query.state.map(|s| s.as_str().to_string()))]);
        self.send(self.request(Method::GET, &format!("/pull_requests{}", qs)))
            .await
    }

    pub async fn get_pull_request(&self, id: i32) -> Result<PullRequest, ClientError> {
        self.send(self.request(Method::GET, &format!("/pull_requests/{}", id)))
            .await
    }

    pub async fn create_pull_request(
        &self,
        req: &CreatePullRequestRequest,
    ) -> Result<PullRequest, ClientError> {
        self.send(self.request(Method::POST, "/pull_requests").json(req))
            .await
    }

    pub async fn update_pull_request(
        &self,
        id: i32,
        req: &UpdatePullRequestRequest,
    ) -> Result<PullRequest, ClientError> {
        self.send(
            self.request(Method::PUT, &format!("/pull_requests/{}", id))
                .json(req),
        )
        .await
    }

    pub async fn delete_pull_request(&self, id: i32) -> Result<(), ClientError> {
        self.send_empty(self.request(Method::DELETE, &format!("/pull_requests/{}", id)))
            .await
    }

    // Device tokens

    pub async fn register_device_token(
        &self,
        req: &RegisterDeviceTokenRequest,
    ) -> Result<DeviceToken, ClientError> {
        self.send(self.request(Method::POST, "/device_tokens").json(req))
            .await
    }

    pub async fn unregister_device_token(&self, token: &str) -> Result<(), ClientError> {
        let path = format!("/device_tokens/{}", urlencoding::encode(token));
        self.send_empty(self.request(Method::DELETE, &path)).await
    }
}
