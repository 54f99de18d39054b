//! E2E report models, DTOs and the generation request envelope.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entity::{e2e_report_detail, e2e_report_summary};
use crate::error::{AppError, AppResult};
use crate::models::app::App;
use crate::models::manual_run::ManualRun;

/// Wire format of report dates.
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Summary lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Ready,
    Failed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "ready" => Some(Self::Ready),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Outcome of the latest finished run for an app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LastRunStatus {
    None,
    Passed,
    Failed,
}

impl LastRunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "passed" => Some(Self::Passed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Per-date aggregate.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub id: i32,
    #[schema(value_type = String, example = "2025-10-02")]
    pub date: NaiveDate,
    pub status: ReportStatus,
    pub total_runs: i32,
    pub passed_runs: i32,
    pub failed_runs: i32,
    pub success_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReportSummary {
    pub fn from_entity(m: e2e_report_summary::Model) -> Self {
        Self {
            id: m.id,
            date: m.date,
            status: ReportStatus::parse(&m.status).unwrap_or(ReportStatus::Pending),
            total_runs: m.total_runs,
            passed_runs: m.passed_runs,
            failed_runs: m.failed_runs,
            success_rate: m.success_rate,
            last_request_id: m.last_request_id,
            generated_at: m.generated_at,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Per-app breakdown of a summary.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetail {
    pub id: i32,
    pub report_summary_id: i32,
    pub app_id: i32,
    pub total_runs: i32,
    pub passed_runs: i32,
    pub failed_runs: i32,
    pub success_rate: f64,
    pub last_run_status: LastRunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_failed_run_at: Option<DateTime<Utc>>,
    /// The app this row describes, when it was loaded alongside
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app: Option<App>,
}

impl ReportDetail {
    pub fn from_entity(m: e2e_report_detail::Model) -> Self {
        Self {
            id: m.id,
            report_summary_id: m.report_summary_id,
            app_id: m.app_id,
            total_runs: m.total_runs,
            passed_runs: m.passed_runs,
            failed_runs: m.failed_runs,
            success_rate: m.success_rate,
            last_run_status: LastRunStatus::parse(&m.last_run_status)
                .unwrap_or(LastRunStatus::None),
            last_run_at: m.last_run_at,
            last_failed_run_at: m.last_failed_run_at,
            app: None,
        }
    }

    pub fn with_app(mut self, app: Option<App>) -> Self {
        self.app = app;
        self
    }
}

/// Summary with its per-app details.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub summary: ReportSummary,
    pub details: Vec<ReportDetail>,
}

/// One app's detail row with the runs it was computed from.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetailResponse {
    pub summary: ReportSummary,
    pub detail: ReportDetail,
    pub runs: Vec<ManualRun>,
}

/// Query parameters for fetching a report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// Report date (YYYY-MM-DD, default today UTC)
    #[serde(default)]
    pub date: Option<String>,
    /// Recompute even when a ready summary exists
    #[serde(default)]
    pub force: Option<bool>,
}

impl ReportQuery {
    pub fn resolved_date(&self) -> AppResult<NaiveDate> {
        match self.date.as_deref() {
            Some(d) => parse_report_date(d),
            None => Ok(Utc::now().date_naive()),
        }
    }

    pub fn force(&self) -> bool {
        self.force.unwrap_or(false)
    }
}

/// Request body for asking the consumer to regenerate a report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct GenerateReportRequest {
    /// Report date (YYYY-MM-DD, default today UTC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Response of `POST /api/e2e_run_report/generate`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportResponse {
    /// YYYY-MM-DD
    pub date: String,
    pub request_id: String,
    /// Subscribers that received the request
    pub receivers: i64,
}

/// Envelope published on the report generation channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportGenerationRequest {
    /// YYYY-MM-DD
    #[schema(value_type = String, example = "2025-10-02")]
    #[serde(with = "report_date")]
    pub date: NaiveDate,
    /// Opaque identifier, usually a UUID
    pub request_id: String,
}

impl ReportGenerationRequest {
    /// Request for the current UTC day with a fresh identifier.
    pub fn for_today() -> Self {
        Self::for_date(Utc::now().date_naive())
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            request_id: Uuid::new_v4().to_string(),
        }
    }
}

/// Years a report date may fall in.
const REPORT_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Strict `YYYY-MM-DD` with a four digit, unsigned year.
fn parse_strict(s: &str) -> Option<NaiveDate> {
    if !s.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(s, REPORT_DATE_FORMAT)
        .ok()
        .filter(|d| REPORT_YEARS.contains(&d.year()))
}

/// Parse a `YYYY-MM-DD` report date.
pub fn parse_report_date(s: &str) -> AppResult<NaiveDate> {
    parse_strict(s.trim()).ok_or_else(|| {
        AppError::Validation(format!("Invalid date '{}': expected YYYY-MM-DD", s))
    })
}

mod report_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{REPORT_DATE_FORMAT, parse_strict};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format(REPORT_DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse_strict(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid date '{}': expected YYYY-MM-DD", raw))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_wire_format() {
        let req = ReportGenerationRequest {
            date: NaiveDate::from_ymd_opt(2025, 10, 2).unwrap(),
            request_id: "abc".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"date": "2025-10-02", "requestId": "abc"}));

        let back: ReportGenerationRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back, req);
    }

    #[test]
    fn test_envelope_rejects_bad_date() {
        let parsed: Result<ReportGenerationRequest, _> =
            serde_json::from_str(r#"{"date":"02/10/2025","requestId":"x"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_for_today_uses_utc_date_and_uuid() {
        let req = ReportGenerationRequest::for_today();
        assert_eq!(req.date, Utc::now().date_naive());
        assert!(Uuid::parse_str(&req.request_id).is_ok());
    }

    #[test]
    fn test_parse_report_date() {
        assert_eq!(
            parse_report_date("2025-10-02").unwrap(),
            NaiveDate::from_ymd_opt(2025, 10, 2).unwrap()
        );
        assert!(matches!(
            parse_report_date("2025-13-01"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_report_date_rejects_out_of_range_years() {
        for raw in ["+262142-12-31", "-0001-01-01", "+2025-10-02", "0000-01-01", "10000-01-01"] {
            assert!(
                matches!(parse_report_date(raw), Err(AppError::Validation(_))),
                "{} should be rejected",
                raw
            );
        }
        assert!(parse_report_date("9999-12-31").is_ok());
        assert!(parse_report_date("0001-01-01").is_ok());
    }

    #[test]
    fn test_envelope_rejects_out_of_range_year() {
        let parsed: Result<ReportGenerationRequest, _> =
            serde_json::from_str(r#"{"date":"+262142-12-31","requestId":"x"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_report_query_defaults() {
        let q = ReportQuery::default();
        assert!(!q.force());
        assert_eq!(q.resolved_date().unwrap(), Utc::now().date_naive());
    }
}
