use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::store::StoreError;
use services::services::{
    cases::CaseError, issuance::IssuanceError, scheduling::SchedulingError, storage::StorageError,
};
use thiserror::Error;
use tracing::error;
use utils::response::ApiResponse;

/// All route failures funnel through here so every response carries the
/// shared JSON envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Case(#[from] CaseError),
    #[error(transparent)]
    Scheduling(#[from] SchedulingError),
    #[error(transparent)]
    Issuance(#[from] IssuanceError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Case(err) => match err {
                CaseError::Validation(_) => StatusCode::BAD_REQUEST,
                CaseError::NotFound(_) | CaseError::ProfessionalNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                CaseError::ProfessionalInactive(_) => StatusCode::CONFLICT,
                CaseError::Store(err) => store_status(err),
            },
            ApiError::Scheduling(err) => match err {
                SchedulingError::Validation(_) => StatusCode::BAD_REQUEST,
                SchedulingError::Store(err) => store_status(err),
            },
            ApiError::Issuance(err) => match err {
                IssuanceError::Validation(_) => StatusCode::BAD_REQUEST,
                IssuanceError::CaseNotFound(_) => StatusCode::NOT_FOUND,
                IssuanceError::NoProfessionalAssigned(_) => StatusCode::CONFLICT,
                IssuanceError::Storage(err) => storage_status(err),
                IssuanceError::Store(err) => store_status(err),
            },
            ApiError::Store(err) => store_status(err),
            ApiError::Storage(err) => storage_status(err),
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::CaseNotFound(_)
        | StoreError::ProfessionalNotFound(_)
        | StoreError::NotificationNotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn storage_status(err: &StorageError) -> StatusCode {
    match err {
        StorageError::KeyExists(_) => StatusCode::CONFLICT,
        StorageError::NotFound(_) => StatusCode::NOT_FOUND,
        StorageError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}
