//! Medical report handlers

use axum::{extract::State, Json};
use arogya_service::dto::{CreateReportRequest, ReportResponse};
use arogya_service::ReportService;

use crate::extractors::{AuthUser, ReportPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Write a report for the appointment behind a presented QR token
///
/// POST /reports
pub async fn create_report(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateReportRequest>,
) -> ApiResult<Created<Json<ReportResponse>>> {
    let service = ReportService::new(state.service_context());
    let response = service.create(&auth.principal, request).await?;
    Ok(Created(Json(response)))
}

/// List the caller's reports, newest first
///
/// GET /reports
pub async fn list_reports(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<ReportResponse>>> {
    let service = ReportService::new(state.service_context());
    let response = service.list(&auth.principal).await?;
    Ok(Json(response))
}

/// GET /reports/{report_id}
pub async fn get_report(
    State(state): State<AppState>,
    auth: AuthUser,
    ReportPath(report_id): ReportPath,
) -> ApiResult<Json<ReportResponse>> {
    let service = ReportService::new(state.service_context());
    let response = service.get(&auth.principal, &report_id).await?;
    Ok(Json(response))
}
