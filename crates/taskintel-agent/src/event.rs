use tokio::sync::mpsc;

use crate::error::AgentError;

/// One event emitted by the model during a turn.
#[derive(Debug, Clone)]
pub struct AgentEvent {
    /// Name of the agent that produced the event.
    pub author: String,
    /// Text carried by the event, if any.
    pub text: Option<String>,
    /// Whether this event closes the turn.
    pub is_final: bool,
}

impl AgentEvent {
    /// An intermediate event carrying a fragment of streamed text.
    pub fn partial(author: &str, text: impl Into<String>) -> Self {
        AgentEvent {
            author: author.to_string(),
            text: Some(text.into()),
            is_final: false,
        }
    }

    /// The terminal event of a turn, carrying the complete answer.
    pub fn final_response(author: &str, text: impl Into<String>) -> Self {
        AgentEvent {
            author: author.to_string(),
            text: Some(text.into()),
            is_final: true,
        }
    }

    pub fn is_final_response(&self) -> bool {
        self.is_final
    }
}

/// Finite, non-restartable sequence of events for one agent turn.
///
/// Backed by a bounded channel; the producer half lives with the model
/// client. The stream ends when the producer drops its sender.
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::Receiver<Result<AgentEvent, AgentError>>,
}

impl EventStream {
    /// Create a sender/stream pair with the given channel depth.
    pub fn channel(buffer: usize) -> (mpsc::Sender<Result<AgentEvent, AgentError>>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, EventStream { rx })
    }

    /// Next event, or None once the turn is over.
    pub async fn next(&mut self) -> Option<Result<AgentEvent, AgentError>> {
        self.rx.recv().await
    }
}
