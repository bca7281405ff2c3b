//! Gemini API client.
//!
//! Talks to the `streamGenerateContent` endpoint and folds the SSE
//! chunk stream into turn events.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use reqwest_eventsource::{Event, EventSource};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::event::{AgentEvent, EventStream};
use crate::model::ModelClient;
use crate::session::Session;

/// Channel depth for in-flight events per turn.
const EVENT_BUFFER: usize = 32;

/// Streaming client for the Gemini generateContent API.
pub struct GeminiClient {
    base_url: String,
    api_key: Option<String>,
    http: Client,
}

impl GeminiClient {
    /// Create a client. The API key may be absent; each turn then fails
    /// with an invocation error instead of the process refusing to start.
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AgentError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AgentError::Invocation(e.to_string()))?;

        Ok(GeminiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            http,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url, model
        )
    }

    /// Build the request body for the Gemini API.
    fn build_request_body(agent: &AgentConfig, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "systemInstruction": {
                "parts": [ { "text": agent.instruction } ]
            },
            "contents": [
                {
                    "role": "user",
                    "parts": [ { "text": prompt } ]
                }
            ]
        })
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn stream_turn(
        &self,
        agent: &AgentConfig,
        session: &Session,
        prompt: &str,
    ) -> Result<EventStream, AgentError> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| AgentError::Invocation("GEMINI_API_KEY is not set".to_string()))?;

        let url = self.stream_url(&agent.model);
        debug!(%url, session_id = %session.id, "stream_turn: starting");

        let request = self
            .http
            .post(url)
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&Self::build_request_body(agent, prompt));

        let es = EventSource::new(request).map_err(|e| AgentError::Invocation(e.to_string()))?;

        let (tx, stream) = EventStream::channel(EVENT_BUFFER);
        let author = agent.name.clone();
        let session_id = session.id.clone();
        tokio::spawn(pump_events(es, author, session_id, tx));

        Ok(stream)
    }
}

/// Consume the SSE source and forward turn events until the model
/// reports a finish reason or the stream closes. Dropping the sender
/// without a final event surfaces as NoFinalResponse in the runner.
async fn pump_events(
    mut es: EventSource,
    author: String,
    session_id: String,
    tx: mpsc::Sender<Result<AgentEvent, AgentError>>,
) {
    let mut turn = TurnAccumulator::new();

    while let Some(event) = es.next().await {
        match event {
            Ok(Event::Open) => {
                debug!(%session_id, "pump_events: stream open");
            }
            Ok(Event::Message(msg)) => match turn.push_chunk(&msg.data) {
                Ok(ChunkOutcome::Finished(text)) => {
                    debug!(%session_id, "pump_events: finish reason received");
                    let _ = tx.send(Ok(AgentEvent::final_response(&author, text))).await;
                    es.close();
                    break;
                }
                Ok(ChunkOutcome::Partial(Some(fragment))) => {
                    let _ = tx.send(Ok(AgentEvent::partial(&author, fragment))).await;
                }
                Ok(ChunkOutcome::Partial(None)) => {}
                Err(e) => {
                    warn!(%session_id, error = %e, "pump_events: bad chunk");
                    let _ = tx.send(Err(e)).await;
                    es.close();
                    break;
                }
            },
            // EventSource reconnects by default; a closed stream without
            // a finish reason must end the turn instead.
            Err(reqwest_eventsource::Error::StreamEnded) => {
                debug!(%session_id, "pump_events: stream ended");
                break;
            }
            Err(e) => {
                warn!(%session_id, error = %e, "pump_events: stream error");
                let _ = tx
                    .send(Err(AgentError::Invocation(e.to_string())))
                    .await;
                es.close();
                break;
            }
        }
    }
}

/// Outcome of folding one SSE chunk into the turn.
#[derive(Debug, PartialEq)]
enum ChunkOutcome {
    /// More chunks expected; carries the text fragment, if any.
    Partial(Option<String>),
    /// The model reported a finish reason; carries the full turn text.
    Finished(String),
}

/// Accumulates streamed chunk text across one model turn.
struct TurnAccumulator {
    text: String,
}

impl TurnAccumulator {
    fn new() -> Self {
        TurnAccumulator {
            text: String::new(),
        }
    }

    fn push_chunk(&mut self, data: &str) -> Result<ChunkOutcome, AgentError> {
        let chunk: GenerateContentChunk = serde_json::from_str(data)
            .map_err(|e| AgentError::Invocation(format!("malformed stream chunk: {e}")))?;

        let mut fragment = None;
        let mut finished = false;

        if let Some(candidate) = chunk.candidates.into_iter().next() {
            if let Some(content) = candidate.content {
                let piece: String = content.parts.into_iter().filter_map(|p| p.text).collect();
                if !piece.is_empty() {
                    self.text.push_str(&piece);
                    fragment = Some(piece);
                }
            }
            finished = candidate.finish_reason.is_some();
        }

        if finished {
            Ok(ChunkOutcome::Finished(std::mem::take(&mut self.text)))
        } else {
            Ok(ChunkOutcome::Partial(fragment))
        }
    }
}

// Gemini streaming response chunk types

#[derive(Debug, Deserialize)]
struct GenerateContentChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ChunkContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChunkContent {
    #[serde(default)]
    parts: Vec<ChunkPart>,
}

#[derive(Debug, Deserialize)]
struct ChunkPart {
    text: Option<String>,
}
