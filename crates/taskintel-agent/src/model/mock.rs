use async_trait::async_trait;

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::event::{AgentEvent, EventStream};
use crate::model::ModelClient;
use crate::session::Session;

/// A scripted model client for testing. Each variant plays out one
/// failure or success mode of a real backend.
pub struct MockClient {
    script: Script,
}

enum Script {
    /// One final event carrying this text.
    FinalText(String),
    /// Exactly these events, in order.
    Events(Vec<AgentEvent>),
    /// stream_turn itself fails.
    StartError(String),
    /// Partial events only; the stream ends without a final event.
    NoFinal,
    /// One partial event, then a stream error.
    MidStreamError(String),
    /// A final event holding a one-subtask JSON object titled with the
    /// prompt.
    ReflectPrompt,
    /// No events at all until well past any reasonable timeout.
    Hang,
}

impl MockClient {
    /// A turn that succeeds with the given final text.
    pub fn with_final_text(text: &str) -> Self {
        Self {
            script: Script::FinalText(text.to_string()),
        }
    }

    /// A turn that emits exactly the given events.
    pub fn with_events(events: Vec<AgentEvent>) -> Self {
        Self {
            script: Script::Events(events),
        }
    }

    /// A turn that fails before any event is produced.
    pub fn failing(message: &str) -> Self {
        Self {
            script: Script::StartError(message.to_string()),
        }
    }

    /// A turn whose stream ends without a final event.
    pub fn never_finishing() -> Self {
        Self {
            script: Script::NoFinal,
        }
    }

    /// A turn that errors after one partial event.
    pub fn erroring_mid_stream(message: &str) -> Self {
        Self {
            script: Script::MidStreamError(message.to_string()),
        }
    }

    /// A turn that answers with one subtask titled with the prompt.
    /// Useful for checking that concurrent requests get their own
    /// answers.
    pub fn reflecting_prompt() -> Self {
        Self {
            script: Script::ReflectPrompt,
        }
    }

    /// A turn that stalls until the caller's timeout fires.
    pub fn hanging() -> Self {
        Self {
            script: Script::Hang,
        }
    }
}

#[async_trait]
impl ModelClient for MockClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn stream_turn(
        &self,
        agent: &AgentConfig,
        _session: &Session,
        prompt: &str,
    ) -> Result<EventStream, AgentError> {
        let author = agent.name.as_str();
        let events: Vec<Result<AgentEvent, AgentError>> = match &self.script {
            Script::StartError(message) => {
                return Err(AgentError::Invocation(message.clone()));
            }
            Script::Hang => {
                let (tx, stream) = EventStream::channel(16);
                tokio::spawn(async move {
                    tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
                    drop(tx);
                });
                return Ok(stream);
            }
            Script::FinalText(text) => {
                vec![Ok(AgentEvent::final_response(author, text.clone()))]
            }
            Script::Events(events) => events.iter().cloned().map(Ok).collect(),
            Script::NoFinal => vec![
                Ok(AgentEvent::partial(author, "working on it")),
                Ok(AgentEvent::partial(author, "almost there")),
            ],
            Script::MidStreamError(message) => vec![
                Ok(AgentEvent::partial(author, "working on it")),
                Err(AgentError::Invocation(message.clone())),
            ],
            Script::ReflectPrompt => {
                let body = serde_json::json!({
                    "subtasks": [ { "title": prompt, "description": null } ]
                });
                vec![Ok(AgentEvent::final_response(author, body.to_string()))]
            }
        };

        let (tx, stream) = EventStream::channel(16);
        tokio::spawn(async move {
            for event in events {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        });

        Ok(stream)
    }
}
