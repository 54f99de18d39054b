//! E2E report and manual run endpoints.

use chrono::NaiveDate;
use reqwest::Method;

use super::{ClientError, DashboardClient, query_string};
use crate::models::{
    CreateManualRunRequest, GenerateReportRequest, GenerateReportResponse, ListManualRunsQuery,
    ManualRun, ReportDetailResponse, ReportResponse, UpdateManualRunRequest,
};

impl DashboardClient {
    /// Fetch the report for `date` (today UTC when `None`), recomputing it
    /// when `force` is set.
    pub async fn get_report(
        &self,
        date: Option<NaiveDate>,
        force: bool,
    ) -> Result<ReportResponse, ClientError> {
        let qs = query_string(&[
            ("date", date.map(|d| d.format("%Y-%m-%d").to_string())),
            ("force", force.then(|| "true".to_string())),
        ]);
        self.send(self.request(Method::GET, &format!("/e2e_run_report{}", qs)))
            .await
    }

    pub async fn get_report_detail(
        &self,
        summary_id: i32,
        app_id: i32,
    ) -> Result<ReportDetailResponse, ClientError> {
        let path = format!("/e2e_run_report/{}/{}", summary_id, app_id);
        self.send(self.request(Method::GET, &path)).await
    }

    /// Ask the backend to publish a generation request for `date`.
    pub async fn request_report_generation(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<GenerateReportResponse, ClientError> {
        let body = GenerateReportRequest {
            date: date.map(|d| d.format("%Y-%m-%d").to_string()),
        };
        self.send(
            self.request(Method::POST, "/e2e_run_report/generate")
                .json(&body),
        )
        .await
    }

    pub async fn list_manual_runs(
        &self,
        query: &ListManualRunsQuery,
    ) -> Result<Vec<ManualRun>, ClientError> {
        let qs = query_string(&[
            ("appId", query.app_id.map(|v| v.to_string())),
            ("status", query.status.map(|s| s.as_str().to_string())),
            ("limit", query.limit.map(|v| v.to_string())),
        ]);
        self.send(self.request(Method::GET, &format!("/e2e_manual_runs{}", qs)))
            .await
    }

    pub async fn create_manual_run(
        &self,
        req: &CreateManualRunRequest,
    ) -> Result<ManualRun, ClientError> {
        self.send(self.request(Method::POST, "/e2e_manual_runs").json(req))
            .await
    }

    pub async fn update_manual_run(
        &self,
        id: i32,
        req: &UpdateManualRunRequest,
    ) -> Result<ManualRun, ClientError> {
        self.send(
            self.request(Method::PATCH, &format!("/e2e_manual_runs/{}", id))
                .json(req),
        )
        .await
    }
}
