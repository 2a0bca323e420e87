use serde::Deserialize;

/// One decoded element of the agent's batch reply. `tag` is echoed by the
/// agent but never trusted; identity fields always come from the input
/// article the `id` maps back to.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchEntry {
    pub id: usize,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
}

/// Outcome of the invoke-and-parse step. The orchestrator branches on
/// this tag; the fallback path is an ordinary branch, not caught control
/// flow.
#[derive(Debug)]
pub enum BatchOutcome {
    Parsed(Vec<BatchEntry>),
    Failed(String),
}

/// Best-effort decode of a structured array embedded in free text.
///
/// The agent is instructed to answer with only a JSON array, but replies
/// routinely carry leading or trailing commentary. The contract here:
/// a matching bracket pair must exist and the substring between the first
/// `[` and the last `]` must decode cleanly; anything else is a failure
/// outcome.
pub fn parse_batch_response(raw: &str) -> BatchOutcome {
    let Some(start) = raw.find('[') else {
        return BatchOutcome::Failed("no opening bracket in response".to_string());
    };
    let Some(end) = raw.rfind(']') else {
        return BatchOutcome::Failed("no closing bracket in response".to_string());
    };
    if end < start {
        return BatchOutcome::Failed("brackets out of order in response".to_string());
    }
    match serde_json::from_str::<Vec<BatchEntry>>(&raw[start..=end]) {
        Ok(entries) => BatchOutcome::Parsed(entries),
        Err(e) => BatchOutcome::Failed(format!("undecodable payload: {}", e)),
    }
}
