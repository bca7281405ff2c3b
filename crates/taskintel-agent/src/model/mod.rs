pub mod gemini;
pub mod mock;

use async_trait::async_trait;

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::event::EventStream;
use crate::session::Session;

/// Trait for conversational model backends.
///
/// Each backend encapsulates:
/// - How to reach the model service (transport, endpoint, credentials)
/// - How streamed output maps onto turn events
///
/// The trait does NOT handle:
/// - Prompt assembly (handled by the caller)
/// - Final-event selection (handled by the runner)
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Backend name for logging and health reporting.
    fn name(&self) -> &str;

    /// Start one turn against the model and return its event stream.
    async fn stream_turn(
        &self,
        agent: &AgentConfig,
        session: &Session,
        prompt: &str,
    ) -> Result<EventStream, AgentError>;
}
