//! GenAI semantic convention span helpers for LLM operations.
//!
//! Uses OpenTelemetry GenAI semantic conventions:
//! - `gen_ai.operation.name`
//! - `gen_ai.request.model`
//! - `gen_ai.provider.name`
//! - `gen_ai.request.max_tokens`

use tracing::Span;

/// Start a span for a chat/completion operation.
pub fn start_chat_span(model: &str, provider: &str, max_tokens: u64) -> Span {
    tracing::info_span!(
        "gen_ai.chat",
        "gen_ai.operation.name" = "chat",
        "gen_ai.request.model" = model,
        "gen_ai.provider.name" = provider,
        "gen_ai.request.max_tokens" = max_tokens,
    )
}
