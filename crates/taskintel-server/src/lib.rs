pub mod config;
pub mod prompt;
pub mod test_helpers;
mod routes;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::http::HeaderValue;
use taskintel_agent::model::ModelClient;
use taskintel_agent::{AgentConfig, InMemorySessionService, Runner};
use tokio::net::TcpListener;

use routes::InnerAppState;

pub async fn serve(
    listener: TcpListener,
    client: Arc<dyn ModelClient>,
    agent_timeout: Duration,
    allowed_origin: HeaderValue,
) -> Result<()> {
    let state = Arc::new(InnerAppState {
        runner: Runner::new(AgentConfig::project_planner(), client),
        sessions: InMemorySessionService::new(),
        agent_timeout,
    });
    let app = routes::build_router(state, allowed_origin);
    axum::serve(listener, app).await?;
    Ok(())
}
