/// Declarative description of a conversational agent: which model runs
/// the turn and the instruction that frames it.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Agent name, used as the author on emitted events.
    pub name: String,
    pub description: String,
    /// Model identifier, e.g. "gemini-2.5-flash".
    pub model: String,
    /// System instruction sent with every turn.
    pub instruction: String,
}

const PLANNER_INSTRUCTION: &str =
    "You are an expert project planner. Given a task title and description, \
     break it down into 3-5 logical, actionable sub-tasks. Return ONLY a JSON \
     object with a 'subtasks' key containing the list of sub-tasks. Example: \
     {'subtasks': [{'title': 'Subtask 1', 'description': 'desc'}, ...]}";

impl AgentConfig {
    /// The task-decomposition agent.
    pub fn project_planner() -> Self {
        AgentConfig {
            name: "project_planner".to_string(),
            description: "Breaks down a task into subtasks".to_string(),
            model: "gemini-2.5-flash".to_string(),
            instruction: PLANNER_INSTRUCTION.to_string(),
        }
    }
}
