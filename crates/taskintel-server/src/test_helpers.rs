use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use taskintel_agent::model::ModelClient;
use taskintel_agent::{AgentConfig, InMemorySessionService, Runner};
use tokio::net::TcpListener;

use crate::routes::{self, AppState, InnerAppState};

/// Origin the test router grants CORS access to.
pub const TEST_ORIGIN: &str = "http://localhost:3000";

/// Build a test router around the given model client.
pub fn test_router(client: Arc<dyn ModelClient>) -> Router {
    test_router_with_timeout(client, Duration::from_secs(5))
}

/// Build a test router with an explicit agent timeout.
pub fn test_router_with_timeout(client: Arc<dyn ModelClient>, timeout: Duration) -> Router {
    let state: AppState = Arc::new(InnerAppState {
        runner: Runner::new(AgentConfig::project_planner(), client),
        sessions: InMemorySessionService::new(),
        agent_timeout: timeout,
    });
    routes::build_router(state, HeaderValue::from_static(TEST_ORIGIN))
}

/// A running test server with base_url and background task handle.
pub struct TestServer {
    pub base_url: String,
    _handle: tokio::task::JoinHandle<()>,
}

/// Spawn an axum test server on a random port. Returns the TestServer
/// with the `base_url` (e.g. "http://127.0.0.1:12345").
pub async fn spawn_test_server(client: Arc<dyn ModelClient>) -> TestServer {
    spawn_test_server_with_timeout(client, Duration::from_secs(5)).await
}

/// Spawn a test server with an explicit agent timeout.
pub async fn spawn_test_server_with_timeout(
    client: Arc<dyn ModelClient>,
    timeout: Duration,
) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let app = test_router_with_timeout(client, timeout);
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base_url,
        _handle: handle,
    }
}
