//! Extraction of typed payloads from model output.
//!
//! The gateway returns free-form text that is expected, but not
//! guaranteed, to be JSON of a known shape. Parsing is the only fallback:
//! a response that does not parse is a hard `MalformedResponse`.

use flowdeck_common::{FlowdeckError, FlowdeckResult, PriorityAssignment};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Strip a surrounding markdown code fence, if present.
///
/// Models routinely wrap JSON in ```` ``` ```` or ```` ```json ````
/// fences despite the "JSON only" instruction. The fence line (with its
/// optional language tag) and the trailing fence are dropped; anything
/// not fully fenced passes through trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        let Some(newline) = rest.find('\n') else {
            return trimmed;
        };
        if let Some(inner) = rest[newline + 1..].trim_end().strip_suffix("```") {
            return inner.trim();
        }
    }
    trimmed
}

/// Parse model output into a typed payload.
pub fn parse_payload<T: DeserializeOwned>(text: &str) -> FlowdeckResult<T> {
    let json_text = strip_code_fence(text);
    serde_json::from_str(json_text)
        .map_err(|e| FlowdeckError::malformed(format!("failed to parse model output as JSON: {e}")))
}

/// Reject prioritization output carrying priorities outside 1-5.
pub fn validate_assignments(assignments: &[PriorityAssignment]) -> FlowdeckResult<()> {
    for assignment in assignments {
        if !(1..=5).contains(&assignment.priority) {
            return Err(FlowdeckError::malformed(format!(
                "priority {} for card '{}' is outside 1-5",
                assignment.priority, assignment.id
            )));
        }
    }
    Ok(())
}

/// Model payload for the daily briefing. Missing keys degrade to empty
/// values rather than failing the briefing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BriefingPayload {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}
