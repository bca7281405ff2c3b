use taskintel_core::TaskInput;

/// Context line used when the caller supplied no description.
const NO_CONTEXT: &str = "No extra context.";

/// Assemble the planner prompt for one task.
pub fn build_prompt(input: &TaskInput) -> String {
    let context = input
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(NO_CONTEXT);
    format!("Objective: {}\nContext: {}", input.title, context)
}
