//! # Interview Session API
//!
//! Each session is an [`InterviewSession`] owned by the server, keyed by a
//! generated id. Handlers hold the session's own mutex for the duration of a
//! turn, so oracle round-trips for one interview serialize naturally while
//! other interviews proceed.
//!
//! ## Endpoints
//!
//! - `GET  /api/roles` - Role choices and question-count bounds
//! - `POST /api/interviews` - Create a session (welcome message included)
//! - `GET  /api/interviews/{id}` - Read-only transcript view
//! - `POST /api/interviews/{id}/answer` - Submit an answer, run one turn
//! - `POST /api/interviews/{id}/reset` - Discard state, start over

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

use greenroom_core::{
    EvalOutcome, InterviewSession, SessionView, SubmitOutcome, TurnOutcome,
    DEFAULT_QUESTION_LIMIT, MAX_QUESTION_LIMIT, MIN_QUESTION_LIMIT,
};
use greenroom_logging::LogEvent;
use greenroom_oracle::JobRole;
use greenroom_reports::ReportRecord;

use super::AppState;

#[derive(Serialize)]
pub struct RolesResponse {
    pub roles: Vec<String>,
    pub min_questions: usize,
    pub max_questions: usize,
    pub default_questions: usize,
}

#[derive(Debug, Deserialize)]
pub struct CreateInterviewRequest {
    pub role: JobRole,
    pub question_limit: Option<usize>,
}

#[derive(Serialize)]
pub struct CreateInterviewResponse {
    pub session_id: String,
    pub view: SessionView,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub content: String,
}

pub async fn get_roles() -> Json<RolesResponse> {
    Json(RolesResponse {
        roles: JobRole::ALL.iter().map(|r| r.to_string()).collect(),
        min_questions: MIN_QUESTION_LIMIT,
        max_questions: MAX_QUESTION_LIMIT,
        default_questions: DEFAULT_QUESTION_LIMIT,
    })
}

pub async fn create_interview(
    State(state): State<AppState>,
    Json(req): Json<CreateInterviewRequest>,
) -> Result<Json<CreateInterviewResponse>, (StatusCode, String)> {
    let limit = req.question_limit.unwrap_or(DEFAULT_QUESTION_LIMIT);
    let mut session = InterviewSession::new(req.role, limit)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    session.begin();

    let session_id = format!("interview-{}", uuid::Uuid::new_v4());
    let view = session.view();

    state
        .sessions
        .write()
        .await
        .insert(session_id.clone(), Arc::new(Mutex::new(session)));

    state.logger.log(&LogEvent::SessionStarted {
        role: req.role.to_string(),
        question_limit: limit,
    });

    Ok(Json(CreateInterviewResponse { session_id, view }))
}

pub async fn get_interview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, (StatusCode, String)> {
    let session = lookup(&state, &id).await?;
    let view = session.lock().await.view();
    Ok(Json(view))
}

/// Submit an answer and run one full turn: answer recorded, oracle consulted,
/// next question (or closing message and evaluation) appended.
///
/// Oracle failure is not an HTTP error; it surfaces as an apology message in
/// the returned view, and resubmitting the same answer retries the step.
pub async fn submit_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<Json<SessionView>, (StatusCode, String)> {
    let session = lookup(&state, &id).await?;
    let mut session = session.lock().await;

    match session.submit_answer(&req.content) {
        SubmitOutcome::Accepted => {}
        SubmitOutcome::IgnoredEmpty => return Ok(Json(session.view())),
        SubmitOutcome::AlreadyPending => {
            return Err((
                StatusCode::CONFLICT,
                "An oracle call is already in flight for this session".to_string(),
            ));
        }
        SubmitOutcome::AlreadyFinished => {
            // A finished session with no report yet means a failed evaluation;
            // let the client retry it by posting again.
            finalize_and_persist(&state, &mut session).await;
            return Ok(Json(session.view()));
        }
    }

    let outcome = session
        .advance(state.oracle.as_ref(), &state.oracle_config)
        .await;

    if outcome == TurnOutcome::Completed {
        finalize_and_persist(&state, &mut session).await;
    }

    Ok(Json(session.view()))
}

pub async fn reset_interview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, (StatusCode, String)> {
    let session = lookup(&state, &id).await?;
    let mut session = session.lock().await;
    session.reset();
    session.begin();
    state.logger.log(&LogEvent::SessionReset);
    Ok(Json(session.view()))
}

async fn finalize_and_persist(state: &AppState, session: &mut InterviewSession) {
    let outcome = session
        .finalize(state.oracle.as_ref(), &state.oracle_config)
        .await;

    if let EvalOutcome::Evaluated { report } = outcome {
        let record = ReportRecord::new(
            session.role(),
            session.question_limit(),
            session.history().to_vec(),
            report,
        );
        match state.store.save(&record) {
            Ok(path) => state.logger.log(&LogEvent::ReportSaved { path }),
            Err(e) => {
                // The report is still in the transcript; losing the file copy
                // should not fail the request
                warn!(error = %e, "Failed to persist evaluation report");
            }
        }
    }
}

async fn lookup(
    state: &AppState,
    id: &str,
) -> Result<Arc<Mutex<InterviewSession>>, (StatusCode, String)> {
    state
        .sessions
        .read()
        .await
        .get(id)
        .cloned()
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("No such session: {}", id)))
}
