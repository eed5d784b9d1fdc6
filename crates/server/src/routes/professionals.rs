use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post, put},
};
use db::{
    models::professional::{CreateProfessional, Professional, UpdateProfessional},
    store::ProfessionalStore,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    session::{Resource, SessionContext},
};

/// POST /api/professionals
/// Add a professional to the panel roster
pub async fn create_professional(
    State(state): State<AppState>,
    session: SessionContext,
    axum::Json(payload): axum::Json<CreateProfessional>,
) -> Result<ResponseJson<ApiResponse<Professional>>, ApiError> {
    session.require(Resource::Roster)?;
    let professional = Professional::new(payload);
    state.professionals.insert(professional.clone()).await?;
    Ok(ResponseJson(ApiResponse::success(professional)))
}

/// GET /api/professionals
/// The full panel roster
pub async fn list_professionals(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<ResponseJson<ApiResponse<Vec<Professional>>>, ApiError> {
    session.require(Resource::Roster)?;
    let roster = state.professionals.list().await?;
    Ok(ResponseJson(ApiResponse::success(roster)))
}

/// PUT /api/professionals/{id}
/// Update contact details, specialization or active status
pub async fn update_professional(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateProfessional>,
) -> Result<ResponseJson<ApiResponse<Professional>>, ApiError> {
    session.require(Resource::Roster)?;
    let professional = state.professionals.update(id, payload).await?;
    Ok(ResponseJson(ApiResponse::success(professional)))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/professionals",
        Router::new()
            .route("/", post(create_professional).get(list_professionals))
            .route("/{id}", put(update_professional)),
    )
}
