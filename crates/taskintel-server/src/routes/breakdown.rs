use axum::{extract::State, routing::post, Json, Router};
use taskintel_agent::{extract_breakdown, AgentError};
use taskintel_core::{BreakdownResponse, TaskInput};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::AppState;
use crate::prompt::build_prompt;

/// Application name under which planner sessions are registered.
pub const APP_NAME: &str = "task_intelligence_agent";
/// All requests run as this user; there is no authentication.
pub const DEFAULT_USER: &str = "default_user";

pub fn routes() -> Router<AppState> {
    Router::new().route("/breakdown", post(breakdown))
}

/// POST /breakdown. Always answers 200 with a breakdown payload; any
/// pipeline failure is logged and replaced by the fallback plan.
async fn breakdown(
    State(state): State<AppState>,
    Json(input): Json<TaskInput>,
) -> Json<BreakdownResponse> {
    info!("breakdown: request for task '{}'", input.title);

    let session_id = format!("session_{}", Uuid::new_v4());
    match run_breakdown(&state, &input, &session_id).await {
        Ok(response) => {
            info!(
                "breakdown: returning {} subtasks ({session_id})",
                response.subtasks.len()
            );
            Json(response)
        }
        Err(e) => {
            warn!("breakdown: pipeline failed ({e}), returning fallback ({session_id})");
            Json(BreakdownResponse::fallback())
        }
    }
}

/// The pipeline as one fallible unit: session, agent turn, extraction.
/// The session is request-scoped and discarded on every path.
async fn run_breakdown(
    state: &AppState,
    input: &TaskInput,
    session_id: &str,
) -> Result<BreakdownResponse, AgentError> {
    let session = state.sessions.create(APP_NAME, DEFAULT_USER, session_id)?;
    debug!("run_breakdown: session {session_id} created");

    let prompt = build_prompt(input);
    let outcome =
        tokio::time::timeout(state.agent_timeout, state.runner.run(&session, &prompt)).await;
    state.sessions.discard(APP_NAME, DEFAULT_USER, session_id);

    let text = match outcome {
        Ok(result) => result?,
        Err(_) => {
            return Err(AgentError::Invocation(format!(
                "agent timed out after {:?}",
                state.agent_timeout
            )))
        }
    };
    debug!("run_breakdown: final response captured ({session_id})");

    extract_breakdown(&text)
}
