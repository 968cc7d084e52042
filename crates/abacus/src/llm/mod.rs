//! Reasoning-capability integration: the provider trait, prompt
//! construction, and the Anthropic and scripted implementations.

mod anthropic;
pub mod prompts;
mod provider;
mod scripted;

pub use anthropic::AnthropicProvider;
pub use provider::{LlmConfig, ProposedStep, ReasoningProvider};
pub use scripted::ScriptedProvider;
