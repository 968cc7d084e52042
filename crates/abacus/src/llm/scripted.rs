//! Scripted reasoning provider: a fixed queue of steps, for tests and
//! offline smoke runs.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::agent::Transcript;
use crate::error::{AbacusError, Result};

use super::provider::{ProposedStep, ReasoningProvider};

/// Deterministic provider that replays a pre-built list of steps.
///
/// When the queue runs dry it keeps proposing a final answer, so a
/// session driven by it always terminates on its own.
pub struct ScriptedProvider {
    steps: Mutex<VecDeque<ProposedStep>>,
    fallback_answer: String,
    fail_proposals: bool,
}

impl ScriptedProvider {
    /// Create a provider that replays `steps` in order.
    pub fn new(steps: Vec<ProposedStep>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            fallback_answer: "No further steps scripted.".to_string(),
            fail_proposals: false,
        }
    }

    /// Set the answer proposed once the script is exhausted.
    pub fn with_fallback_answer(mut self, answer: impl Into<String>) -> Self {
        self.fallback_answer = answer.into();
        self
    }

    /// Make every proposal fail, simulating an unreachable reasoning
    /// capability.
    pub fn failing() -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            fallback_answer: String::new(),
            fail_proposals: true,
        }
    }
}

impl ReasoningProvider for ScriptedProvider {
    fn propose(
        &self,
        _question: &str,
        _overview: &str,
        _transcript: &Transcript,
    ) -> Result<ProposedStep> {
        if self.fail_proposals {
            return Err(AbacusError::Api("scripted failure".to_string()));
        }
        let mut steps = self.steps.lock().expect("scripted queue poisoned");
        Ok(steps.pop_front().unwrap_or(ProposedStep::FinalAnswer {
            answer: self.fallback_answer.clone(),
        }))
    }

    fn summarize(&self, _question: &str, transcript: &Transcript) -> Result<String> {
        if self.fail_proposals {
            return Err(AbacusError::Api("scripted failure".to_string()));
        }
        Ok(format!(
            "Summary of {} executed step(s).",
            transcript.len()
        ))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_replays_then_falls_back() {
        let provider = ScriptedProvider::new(vec![ProposedStep::ToolCall {
            name: "list_sheets".to_string(),
            arguments: json!({}),
        }])
        .with_fallback_answer("done");

        let transcript = Transcript::new();
        let first = provider.propose("q", "", &transcript).unwrap();
        assert!(matches!(first, ProposedStep::ToolCall { .. }));
        let second = provider.propose("q", "", &transcript).unwrap();
        match second {
            ProposedStep::FinalAnswer { answer } => assert_eq!(answer, "done"),
            ProposedStep::ToolCall { .. } => panic!("expected fallback answer"),
        }
    }

    #[test]
    fn test_failing_provider() {
        let provider = ScriptedProvider::failing();
        assert!(provider.propose("q", "", &Transcript::new()).is_err());
        assert!(provider.summarize("q", &Transcript::new()).is_err());
    }
}
