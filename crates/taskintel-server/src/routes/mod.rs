pub mod breakdown;
pub mod health;

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use taskintel_agent::{InMemorySessionService, Runner};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};

pub struct InnerAppState {
    pub runner: Runner,
    pub sessions: InMemorySessionService,
    /// Wall-clock bound for one agent turn.
    pub agent_timeout: Duration,
}

pub type AppState = Arc<InnerAppState>;

pub fn build_router(state: AppState, allowed_origin: HeaderValue) -> Router {
    // Credentialed CORS cannot use wildcard lists, so methods and
    // headers mirror whatever the preflight asks for.
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .merge(health::routes())
        .merge(breakdown::routes())
        .layer(cors)
        .with_state(state)
}
