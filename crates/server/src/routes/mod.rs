pub mod disputes;
pub mod notifications;
pub mod professionals;

use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(disputes::router())
        .merge(notifications::router())
        .merge(professionals::router())
}
