//! LLM advisory backed by Anthropic through rig-core.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::anthropic::Client;
use tracing::{Instrument, debug};

use super::prompt::AdvisoryPrompt;
use super::response::parse_plan;
use super::{AdvisoryError, AdvisoryPlan, Advisor};
use crate::config::AdvisoryConfig;
use crate::engine::Candidates;
use crate::model::OptimizeFor;
use crate::telemetry::genai::start_chat_span;

/// Asks an Anthropic model for an assignment plan. One call per cycle, no
/// retries; the configured timeout bounds the whole request.
pub struct AnthropicAdvisor {
    client: Client,
    config: AdvisoryConfig,
}

impl AnthropicAdvisor {
    pub fn new(client: Client, config: AdvisoryConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Advisor for AnthropicAdvisor {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn propose(
        &self,
        candidates: &Candidates,
        optimize_for: OptimizeFor,
    ) -> Result<AdvisoryPlan, AdvisoryError> {
        let prompt = AdvisoryPrompt::render(candidates, optimize_for);
        let span = start_chat_span(&self.config.model, "anthropic", self.config.max_tokens);

        let agent = self
            .client
            .agent(&self.config.model)
            .preamble(&prompt.system)
            .max_tokens(self.config.max_tokens)
            .temperature(0.3)
            .build();

        let reply = tokio::time::timeout(self.config.timeout, agent.prompt(prompt.user.as_str()))
            .instrument(span)
            .await
            .map_err(|_| AdvisoryError::Timeout(self.config.timeout))?
            .map_err(|e| AdvisoryError::Transport(e.to_string()))?;

        debug!(chars = reply.len(), "advisory reply received");
        parse_plan(&reply)
    }
}
