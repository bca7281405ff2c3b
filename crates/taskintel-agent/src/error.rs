use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("session failure: {0}")]
    Session(String),

    #[error("agent invocation failed: {0}")]
    Invocation(String),

    #[error("agent did not return a final response")]
    NoFinalResponse,

    #[error("extraction failed: {0}")]
    Extraction(String),
}
