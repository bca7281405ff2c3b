use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::error::AgentError;

/// An ephemeral single-turn conversation context. Created per request,
/// discarded once a response is produced.
#[derive(Debug, Clone)]
pub struct Session {
    pub app_name: String,
    pub user_id: String,
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// In-memory session store. Nothing is persisted; a restart loses all
/// sessions, which is acceptable because no session outlives a request.
#[derive(Default)]
pub struct InMemorySessionService {
    sessions: Mutex<HashMap<String, Session>>,
}

impl InMemorySessionService {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(app_name: &str, user_id: &str, session_id: &str) -> String {
        format!("{app_name}/{user_id}/{session_id}")
    }

    /// Register a new session. Fails if the identifier is already taken.
    pub fn create(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<Session, AgentError> {
        let session = Session {
            app_name: app_name.to_string(),
            user_id: user_id.to_string(),
            id: session_id.to_string(),
            created_at: Utc::now(),
        };
        let mut sessions = self.sessions.lock().unwrap();
        let key = Self::key(app_name, user_id, session_id);
        if sessions.contains_key(&key) {
            return Err(AgentError::Session(format!(
                "session already exists: {session_id}"
            )));
        }
        sessions.insert(key, session.clone());
        Ok(session)
    }

    pub fn get(&self, app_name: &str, user_id: &str, session_id: &str) -> Option<Session> {
        self.sessions
            .lock()
            .unwrap()
            .get(&Self::key(app_name, user_id, session_id))
            .cloned()
    }

    /// Remove a session. No-op when the identifier is unknown.
    pub fn discard(&self, app_name: &str, user_id: &str, session_id: &str) {
        self.sessions
            .lock()
            .unwrap()
            .remove(&Self::key(app_name, user_id, session_id));
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
