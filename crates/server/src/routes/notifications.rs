use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::{models::notification::Notification, store::StoreError};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    session::{Resource, SessionContext},
};

/// GET /api/notifications
/// The caller's feed, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<ResponseJson<ApiResponse<Vec<Notification>>>, ApiError> {
    session.require(Resource::Notifications)?;
    let feed = state.notifications.list_for_user(session.user_id).await?;
    Ok(ResponseJson(ApiResponse::success(feed)))
}

/// POST /api/notifications/{id}/read
/// Mark one of the caller's notifications as read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Notification>>, ApiError> {
    session.require(Resource::Notifications)?;

    // Read receipts are scoped to the caller's own feed.
    let owned = state
        .notifications
        .list_for_user(session.user_id)
        .await?
        .into_iter()
        .any(|notification| notification.id == id);
    if !owned {
        return Err(StoreError::NotificationNotFound(id).into());
    }

    let notification = state.notifications.mark_read(id).await?;
    Ok(ResponseJson(ApiResponse::success(notification)))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/notifications",
        Router::new()
            .route("/", get(list_notifications))
            .route("/{id}/read", post(mark_notification_read)),
    )
}
