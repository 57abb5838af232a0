use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use greenroom_reports::{ReportFilter, ReportRecord, ReportSummary};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub role: Option<String>,
    pub after: Option<String>,
    pub before: Option<String>,
}

pub async fn list_reports(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ReportSummary>>, (StatusCode, String)> {
    let filter = build_filter(params).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let summaries = state
        .store
        .list(&filter)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(summaries))
}

pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReportRecord>, (StatusCode, String)> {
    let record = state
        .store
        .get(&id)
        .map_err(|e| (StatusCode::NOT_FOUND, e.to_string()))?;

    Ok(Json(record))
}

fn build_filter(params: ListParams) -> anyhow::Result<ReportFilter> {
    use chrono::{NaiveDate, TimeZone, Utc};

    let role = params
        .role
        .map(|s| s.parse().map_err(|e: String| anyhow::anyhow!(e)))
        .transpose()?;

    let after = params
        .after
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map(|d| Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0).unwrap()))
                .map_err(|e| anyhow::anyhow!("Invalid after date: {}", e))
        })
        .transpose()?;

    let before = params
        .before
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map(|d| Utc.from_utc_datetime(&d.and_hms_opt(23, 59, 59).unwrap()))
                .map_err(|e| anyhow::anyhow!("Invalid before date: {}", e))
        })
        .transpose()?;

    Ok(ReportFilter {
        role,
        after,
        before,
    })
}
