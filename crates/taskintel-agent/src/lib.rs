pub mod config;
pub mod error;
pub mod event;
pub mod extract;
pub mod model;
pub mod runner;
pub mod session;

pub use config::AgentConfig;
pub use error::AgentError;
pub use event::{AgentEvent, EventStream};
pub use extract::extract_breakdown;
pub use model::ModelClient;
pub use runner::Runner;
pub use session::{InMemorySessionService, Session};
