use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A single sub-task parsed from the planner's structured output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    /// Short title for the sub-task
    pub title: String,
    /// What this sub-task accomplishes; serialized as null when absent
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownResponse {
    pub subtasks: Vec<SubTask>,
}

impl BreakdownResponse {
    /// Fixed two-step decomposition returned whenever the planner
    /// pipeline fails. Callers always get a well-formed payload.
    pub fn fallback() -> Self {
        BreakdownResponse {
            subtasks: vec![
                SubTask {
                    title: "Step 1: Planning".to_string(),
                    description: Some("Define requirements".to_string()),
                },
                SubTask {
                    title: "Step 2: Execution".to_string(),
                    description: Some("Start working".to_string()),
                },
            ],
        }
    }
}
