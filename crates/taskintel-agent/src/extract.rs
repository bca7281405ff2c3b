use std::sync::LazyLock;

use regex::Regex;
use taskintel_core::BreakdownResponse;

use crate::error::AgentError;

/// Greedy outermost-brace pattern: first `{` through last `}`, with `.`
/// matching newlines. When the text holds several disjoint objects the
/// single greedy span fails to parse; that outcome is kept as-is and
/// routes the request to the fallback payload.
static JSON_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("Invalid json object regex"));

/// Pull a `BreakdownResponse` out of raw model text, tolerating prose
/// around the JSON object.
pub fn extract_breakdown(raw: &str) -> Result<BreakdownResponse, AgentError> {
    let trimmed = raw.trim();
    let candidate = match JSON_OBJECT_RE.find(trimmed) {
        Some(m) => m.as_str(),
        None => trimmed,
    };
    serde_json::from_str(candidate)
        .map_err(|e| AgentError::Extraction(format!("unparseable model output: {e}")))
}

#[cfg(test)]
mod tests {
    use taskintel_core::SubTask;

    use super::*;

    fn subtask(title: &str, description: Option<&str>) -> SubTask {
        SubTask {
            title: title.to_string(),
            description: description.map(|d| d.to_string()),
        }
    }

    #[test]
    fn pure_json_object() {
        let raw = r#"{"subtasks":[{"title":"Book venue","description":"Find a location"}]}"#;
        let parsed = extract_breakdown(raw).unwrap();
        assert_eq!(
            parsed.subtasks,
            vec![subtask("Book venue", Some("Find a location"))]
        );
    }

    #[test]
    fn json_wrapped_in_prose() {
        let raw = "Here you go:\n{\"subtasks\":[{\"title\":\"Book venue\",\"description\":\"Find a location\"},{\"title\":\"Send invites\"}]}";
        let parsed = extract_breakdown(raw).unwrap();
        assert_eq!(
            parsed.subtasks,
            vec![
                subtask("Book venue", Some("Find a location")),
                subtask("Send invites", None),
            ]
        );
    }

    #[test]
    fn json_with_trailing_prose() {
        let raw = "{\"subtasks\":[{\"title\":\"A\",\"description\":null}]}\nLet me know if you need more detail.";
        // Trailing prose has no brace, so the greedy span is just the object.
        let parsed = extract_breakdown(raw).unwrap();
        assert_eq!(parsed.subtasks, vec![subtask("A", None)]);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let raw = "  \n {\"subtasks\":[]} \n ";
        let parsed = extract_breakdown(raw).unwrap();
        assert!(parsed.subtasks.is_empty());
    }

    #[test]
    fn nested_braces_inside_strings() {
        let raw = r#"{"subtasks":[{"title":"Use {braces}","description":"ok"}]}"#;
        let parsed = extract_breakdown(raw).unwrap();
        assert_eq!(parsed.subtasks[0].title, "Use {braces}");
    }

    #[test]
    fn no_json_at_all() {
        let err = extract_breakdown("I could not produce a plan.").unwrap_err();
        assert!(matches!(err, AgentError::Extraction(_)));
    }

    #[test]
    fn empty_text() {
        let err = extract_breakdown("   ").unwrap_err();
        assert!(matches!(err, AgentError::Extraction(_)));
    }

    #[test]
    fn malformed_json() {
        let err = extract_breakdown("{\"subtasks\": [").unwrap_err();
        assert!(matches!(err, AgentError::Extraction(_)));
    }

    #[test]
    fn wrong_shape() {
        let err = extract_breakdown(r#"{"tasks":[{"title":"A"}]}"#).unwrap_err();
        assert!(matches!(err, AgentError::Extraction(_)));
    }

    #[test]
    fn multiple_disjoint_objects_fail_greedily() {
        // The greedy span runs from the first { to the last }, which is
        // not valid JSON here. That failure is the intended behavior.
        let raw = r#"{"subtasks":[]} and also {"subtasks":[]}"#;
        let err = extract_breakdown(raw).unwrap_err();
        assert!(matches!(err, AgentError::Extraction(_)));
    }

    #[test]
    fn multiline_json() {
        let raw = "{\n  \"subtasks\": [\n    {\"title\": \"A\", \"description\": \"B\"}\n  ]\n}";
        let parsed = extract_breakdown(raw).unwrap();
        assert_eq!(parsed.subtasks, vec![subtask("A", Some("B"))]);
    }
}
