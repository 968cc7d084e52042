//! Reasoning-capability trait and types.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agent::{ToolCall, Transcript};
use crate::error::Result;

/// One step proposed by the reasoning capability: either a tool call to
/// execute, or the signal that it has enough information to answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ProposedStep {
    /// Execute one catalog operation.
    ToolCall {
        name: String,
        #[serde(default)]
        arguments: Value,
    },
    /// Stop and answer with the given text.
    FinalAnswer { answer: String },
}

impl ProposedStep {
    /// Convert a proposed tool call into the agent's call type.
    pub fn into_tool_call(self) -> Option<ToolCall> {
        match self {
            ProposedStep::ToolCall { name, arguments } => Some(ToolCall::new(name, arguments)),
            ProposedStep::FinalAnswer { .. } => None,
        }
    }
}

/// Configuration for reasoning providers.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model to use (e.g., "claude-sonnet-4-20250514").
    pub model: String,

    /// Maximum tokens in response.
    pub max_tokens: usize,

    /// Temperature for generation (0.0-1.0). Zero keeps tool selection
    /// as repeatable as the model allows.
    pub temperature: f64,

    /// Per-request deadline.
    pub request_timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 1024,
            temperature: 0.0,
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Trait for reasoning providers.
///
/// Implementations must be thread-safe (Send + Sync) so independent
/// questions can share one provider across parallel sessions.
pub trait ReasoningProvider: Send + Sync {
    /// Propose the next step for a question.
    ///
    /// # Arguments
    /// * `question` - The user's question
    /// * `overview` - Workbook overview (sheet names, schemas, row counts)
    /// * `transcript` - Everything executed so far
    ///
    /// # Returns
    /// Either a tool call chosen from the published catalog, or a final
    /// answer. Unknown operation names are tolerated downstream by the
    /// execution engine, not rejected here.
    fn propose(
        &self,
        question: &str,
        overview: &str,
        transcript: &Transcript,
    ) -> Result<ProposedStep>;

    /// Produce a final answer from the transcript when the loop stops
    /// without one (step ceiling, forced finalization).
    fn summarize(&self, question: &str, transcript: &Transcript) -> Result<String>;

    /// Get the name of this provider (for logging/debugging).
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_proposed_step_tool_call_json() {
        let step: ProposedStep = serde_json::from_value(json!({
            "action": "tool_call",
            "name": "aggregate",
            "arguments": {"sheet": "Sales", "metric": "Revenue", "aggregator": "sum"}
        }))
        .unwrap();
        let call = step.into_tool_call().unwrap();
        assert_eq!(call.name, "aggregate");
        assert_eq!(call.arguments["metric"], "Revenue");
    }

    #[test]
    fn test_proposed_step_final_answer_json() {
        let step: ProposedStep = serde_json::from_value(json!({
            "action": "final_answer",
            "answer": "Total revenue is 700."
        }))
        .unwrap();
        assert!(matches!(step, ProposedStep::FinalAnswer { .. }));
    }
}
