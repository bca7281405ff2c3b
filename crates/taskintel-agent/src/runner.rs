use std::sync::Arc;

use tracing::debug;

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::model::ModelClient;
use crate::session::Session;

/// Drives a single agent turn: opens the event stream and consumes it
/// until the first final event, returning that event's text.
pub struct Runner {
    agent: AgentConfig,
    client: Arc<dyn ModelClient>,
}

impl Runner {
    pub fn new(agent: AgentConfig, client: Arc<dyn ModelClient>) -> Self {
        Runner { agent, client }
    }

    pub fn agent(&self) -> &AgentConfig {
        &self.agent
    }

    pub async fn run(&self, session: &Session, prompt: &str) -> Result<String, AgentError> {
        let mut events = self.client.stream_turn(&self.agent, session, prompt).await?;

        while let Some(event) = events.next().await {
            let event = event?;
            debug!(
                author = %event.author,
                is_final = event.is_final,
                session_id = %session.id,
                "run: event received"
            );
            if event.is_final_response() {
                // First final event wins; anything after it is ignored.
                return match event.text {
                    Some(text) if !text.is_empty() => Ok(text),
                    _ => Err(AgentError::NoFinalResponse),
                };
            }
        }

        Err(AgentError::NoFinalResponse)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::event::AgentEvent;
    use crate::model::mock::MockClient;

    fn test_session() -> Session {
        Session {
            app_name: "task_intelligence_agent".to_string(),
            user_id: "default_user".to_string(),
            id: "session_test".to_string(),
            created_at: Utc::now(),
        }
    }

    fn runner_with(client: MockClient) -> Runner {
        Runner::new(AgentConfig::project_planner(), Arc::new(client))
    }

    #[tokio::test]
    async fn returns_final_text() {
        let runner = runner_with(MockClient::with_final_text("the answer"));
        let text = runner.run(&test_session(), "prompt").await.unwrap();
        assert_eq!(text, "the answer");
    }

    #[tokio::test]
    async fn skips_partials_before_final() {
        let runner = runner_with(MockClient::with_events(vec![
            AgentEvent::partial("project_planner", "thinking"),
            AgentEvent::partial("project_planner", "still thinking"),
            AgentEvent::final_response("project_planner", "done"),
        ]));
        let text = runner.run(&test_session(), "prompt").await.unwrap();
        assert_eq!(text, "done");
    }

    #[tokio::test]
    async fn stops_at_first_final_event() {
        let runner = runner_with(MockClient::with_events(vec![
            AgentEvent::final_response("project_planner", "first"),
            AgentEvent::final_response("project_planner", "second"),
        ]));
        let text = runner.run(&test_session(), "prompt").await.unwrap();
        assert_eq!(text, "first");
    }

    #[tokio::test]
    async fn no_final_event_is_an_error() {
        let runner = runner_with(MockClient::never_finishing());
        let err = runner.run(&test_session(), "prompt").await.unwrap_err();
        assert!(matches!(err, AgentError::NoFinalResponse));
    }

    #[tokio::test]
    async fn empty_final_text_is_an_error() {
        let runner = runner_with(MockClient::with_events(vec![AgentEvent::final_response(
            "project_planner",
            "",
        )]));
        let err = runner.run(&test_session(), "prompt").await.unwrap_err();
        assert!(matches!(err, AgentError::NoFinalResponse));
    }

    #[tokio::test]
    async fn start_error_propagates() {
        let runner = runner_with(MockClient::failing("connection refused"));
        let err = runner.run(&test_session(), "prompt").await.unwrap_err();
        assert!(matches!(err, AgentError::Invocation(_)));
    }

    #[tokio::test]
    async fn mid_stream_error_propagates() {
        let runner = runner_with(MockClient::erroring_mid_stream("connection reset"));
        let err = runner.run(&test_session(), "prompt").await.unwrap_err();
        assert!(matches!(err, AgentError::Invocation(_)));
    }
}
