//! Dispute lifecycle routes: filing, directory views, assignment,
//! scheduling, issuance and public tracking.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::dispute::{
    Applicant, ContractType, CreateDispute, Dispute, ResolutionMethod, Respondent,
};
use serde::{Deserialize, Serialize};
use services::services::{
    issuance::{IssuanceOutcome, IssueDocumentRequest},
    scheduling::{ScheduleMeetingRequest, ScheduleOutcome},
    storage::{ObjectStore, SIGNED_URL_TTL_SECS},
};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    session::{Resource, SessionContext, can_view_case},
};

/// Filing payload. The filer's id comes from the session, not the body.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct FileDisputeRequest {
    pub applicant: Applicant,
    pub respondent: Respondent,
    pub contract_type: ContractType,
    pub resolution_method: ResolutionMethod,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct AssignProfessionalRequest {
    pub professional_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct AwardUrlResponse {
    pub url: String,
    pub expires_in_secs: u64,
}

/// POST /api/disputes
/// File a new dispute for the calling citizen
pub async fn file_dispute(
    State(state): State<AppState>,
    session: SessionContext,
    axum::Json(payload): axum::Json<FileDisputeRequest>,
) -> Result<ResponseJson<ApiResponse<Dispute>>, ApiError> {
    session.require(Resource::OwnCases)?;

    let dispute = state
        .cases
        .register(CreateDispute {
            user_id: session.user_id,
            applicant: payload.applicant,
            respondent: payload.respondent,
            contract_type: payload.contract_type,
            resolution_method: payload.resolution_method,
            description: payload.description,
        })
        .await?;

    Ok(ResponseJson(ApiResponse::success(dispute)))
}

/// GET /api/disputes
/// Full case directory for admins
pub async fn list_disputes(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<ResponseJson<ApiResponse<Vec<Dispute>>>, ApiError> {
    session.require(Resource::CaseDirectory)?;
    let disputes = state.cases.list().await?;
    Ok(ResponseJson(ApiResponse::success(disputes)))
}

/// GET /api/disputes/mine
/// Cases filed by the calling citizen
pub async fn my_disputes(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<ResponseJson<ApiResponse<Vec<Dispute>>>, ApiError> {
    session.require(Resource::OwnCases)?;
    let disputes = state.cases.list_for_user(session.user_id).await?;
    Ok(ResponseJson(ApiResponse::success(disputes)))
}

/// GET /api/disputes/assigned
/// Cases assigned to the calling professional
pub async fn assigned_disputes(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<ResponseJson<ApiResponse<Vec<Dispute>>>, ApiError> {
    session.require(Resource::Caseload)?;
    let disputes = state.cases.list_for_professional(session.user_id).await?;
    Ok(ResponseJson(ApiResponse::success(disputes)))
}

/// GET /api/disputes/{id}
/// Case detail for the filer, the assigned professional or an admin
pub async fn get_dispute(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Dispute>>, ApiError> {
    let dispute = state.cases.get(id).await?;
    if !can_view_case(&session, &dispute) {
        return Err(ApiError::Forbidden(
            "no access to this case".to_string(),
        ));
    }
    Ok(ResponseJson(ApiResponse::success(dispute)))
}

/// GET /api/track/{reference}
/// Public tracking by case code or id
pub async fn track_case(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<ResponseJson<ApiResponse<Dispute>>, ApiError> {
    let dispute = state.cases.track(&reference).await?;
    Ok(ResponseJson(ApiResponse::success(dispute)))
}

/// POST /api/disputes/{id}/assign
/// Assign an active professional to the case
pub async fn assign_professional(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<AssignProfessionalRequest>,
) -> Result<ResponseJson<ApiResponse<Dispute>>, ApiError> {
    session.require(Resource::CaseDirectory)?;
    let dispute = state
        .cases
        .assign_professional(id, payload.professional_id)
        .await?;
    Ok(ResponseJson(ApiResponse::success(dispute)))
}

/// POST /api/disputes/{id}/meetings
/// Schedule a video conference for the case
pub async fn schedule_meeting(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<ScheduleMeetingRequest>,
) -> Result<ResponseJson<ApiResponse<ScheduleOutcome>>, ApiError> {
    session.require(Resource::Caseload)?;
    let dispute = state.cases.get(id).await?;
    if dispute.assigned_professional_id != Some(session.user_id) {
        return Err(ApiError::Forbidden(
            "only the assigned professional may schedule meetings".to_string(),
        ));
    }

    let outcome = state.scheduling.schedule(id, payload).await?;
    Ok(ResponseJson(ApiResponse::success(outcome)))
}

/// POST /api/disputes/{id}/issue
/// Issue the final award or report for the case
pub async fn issue_document(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<IssueDocumentRequest>,
) -> Result<ResponseJson<ApiResponse<IssuanceOutcome>>, ApiError> {
    session.require(Resource::Caseload)?;
    let dispute = state.cases.get(id).await?;
    if dispute.assigned_professional_id != Some(session.user_id) {
        return Err(ApiError::Forbidden(
            "only the assigned professional may issue documents".to_string(),
        ));
    }

    let outcome = state.issuance.issue(id, payload).await?;
    Ok(ResponseJson(ApiResponse::success(outcome)))
}

/// GET /api/disputes/{id}/award-url
/// Time-limited download link for the issued document
pub async fn award_url(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<AwardUrlResponse>>, ApiError> {
    let dispute = state.cases.get(id).await?;
    if !can_view_case(&session, &dispute) {
        return Err(ApiError::Forbidden(
            "no access to this case".to_string(),
        ));
    }
    let key = dispute.award_object_key.ok_or_else(|| {
        ApiError::NotFound(format!("case {} has no issued document", dispute.case_code))
    })?;

    let url = state.objects.signed_url(&key, SIGNED_URL_TTL_SECS).await?;
    Ok(ResponseJson(ApiResponse::success(AwardUrlResponse {
        url,
        expires_in_secs: SIGNED_URL_TTL_SECS,
    })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/disputes", post(file_dispute).get(list_disputes))
        .route("/disputes/mine", get(my_disputes))
        .route("/disputes/assigned", get(assigned_disputes))
        .route("/track/{reference}", get(track_case))
        .nest(
            "/disputes/{id}",
            Router::new()
                .route("/", get(get_dispute))
                .route("/assign", post(assign_professional))
                .route("/meetings", post(schedule_meeting))
                .route("/issue", post(issue_document))
                .route("/award-url", get(award_url)),
        )
}
