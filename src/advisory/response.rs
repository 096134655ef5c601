//! Parsing of raw advisory text into an [`AdvisoryPlan`].

use super::{AdvisoryError, AdvisoryPlan};

/// Parse the advisory's reply.
///
/// Accepts bare JSON, optionally wrapped in one Markdown code fence.
/// Anything else fails the whole call.
pub fn parse_plan(raw: &str) -> Result<AdvisoryPlan, AdvisoryError> {
    let body = strip_code_fence(raw.trim());
    if body.is_empty() {
        return Err(AdvisoryError::Malformed("empty response".to_string()));
    }
    serde_json::from_str(body).map_err(|e| AdvisoryError::Malformed(e.to_string()))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json") up to the first newline.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}
