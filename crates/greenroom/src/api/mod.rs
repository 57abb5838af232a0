mod interviews;
mod reports;

use std::collections::HashMap;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::CorsLayer;

use greenroom_core::InterviewSession;
use greenroom_logging::Logger;
use greenroom_oracle::{Oracle, OracleConfig};
use greenroom_reports::ReportStore;

/// Live sessions, keyed by session id. Each session has its own lock so one
/// slow oracle call never blocks other interviews.
pub type SessionMap = RwLock<HashMap<String, Arc<Mutex<InterviewSession>>>>;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionMap>,
    pub oracle: Arc<dyn Oracle>,
    pub oracle_config: Arc<OracleConfig>,
    pub store: Arc<ReportStore>,
    pub logger: Arc<Logger>,
}

pub fn create_router(
    oracle: Arc<dyn Oracle>,
    oracle_config: OracleConfig,
    store: Arc<ReportStore>,
    logger: Arc<Logger>,
) -> Router {
    let state = AppState {
        sessions: Arc::new(RwLock::new(HashMap::new())),
        oracle,
        oracle_config: Arc::new(oracle_config),
        store,
        logger,
    };

    Router::new()
        .route("/api/roles", get(interviews::get_roles))
        .route("/api/interviews", post(interviews::create_interview))
        .route("/api/interviews/{id}", get(interviews::get_interview))
        .route(
            "/api/interviews/{id}/answer",
            post(interviews::submit_answer),
        )
        .route(
            "/api/interviews/{id}/reset",
            post(interviews::reset_interview),
        )
        .route("/api/reports", get(reports::list_reports))
        .route("/api/reports/{id}", get(reports::get_report))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
