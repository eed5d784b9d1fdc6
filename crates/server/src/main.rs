use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use db::{memory::MemoryDb, store::ProfessionalStore};
use services::services::{
    cases::CaseService,
    email::{EmailSender, NoopEmailSender, ResendClient},
    issuance::IssuanceService,
    notifications::NotificationService,
    scheduling::SchedulingService,
    storage::{MemoryObjectStore, ObjectStore},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod error;
mod routes;
mod session;

/// Shared handles behind every route. The in-memory store backs all five
/// store traits; swapping in a SQL-backed store only changes this wiring.
#[derive(Clone)]
pub struct AppState {
    pub cases: CaseService,
    pub scheduling: SchedulingService,
    pub issuance: IssuanceService,
    pub notifications: NotificationService,
    pub professionals: Arc<dyn ProfessionalStore>,
    pub objects: Arc<dyn ObjectStore>,
}

impl AppState {
    fn new(email: Arc<dyn EmailSender>) -> Self {
        let db = Arc::new(MemoryDb::new());
        let objects: Arc<dyn ObjectStore> = Arc::new(MemoryObjectStore::new());
        let notifications = NotificationService::new(db.clone());

        Self {
            cases: CaseService::new(db.clone(), db.clone(), notifications.clone()),
            scheduling: SchedulingService::new(
                db.clone(),
                db.clone(),
                notifications.clone(),
                email.clone(),
            ),
            issuance: IssuanceService::new(
                db.clone(),
                db.clone(),
                db.clone(),
                db.clone(),
                objects.clone(),
                notifications.clone(),
                email,
            ),
            notifications,
            professionals: db,
            objects,
        }
    }
}

fn email_sender() -> Arc<dyn EmailSender> {
    match ResendClient::from_env() {
        Ok(client) => Arc::new(client),
        Err(err) => {
            warn!(error = %err, "email delivery disabled");
            Arc::new(NoopEmailSender)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let state = AppState::new(email_sender());

    let app = Router::new()
        .nest("/api", routes::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("eNyaya Resolve API listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
