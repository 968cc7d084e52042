//! Anthropic Claude API provider implementation.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;

use crate::agent::Transcript;
use crate::error::{AbacusError, Result};

use super::prompts;
use super::provider::{LlmConfig, ProposedStep, ReasoningProvider};

/// Anthropic API endpoint.
const API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API version.
const API_VERSION: &str = "2023-06-01";

/// Anthropic Claude provider.
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    config: LlmConfig,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, LlmConfig::default())
    }

    /// Create a new Anthropic provider with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AbacusError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Create from the `ANTHROPIC_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            AbacusError::Config("ANTHROPIC_API_KEY environment variable not set".to_string())
        })?;
        Self::new(api_key)
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| AbacusError::Config(format!("Invalid API key: {e}")))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        Ok(headers)
    }

    /// Send one message and return the text content.
    fn send_message(&self, user_prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": prompts::system_prompt(),
            "messages": [
                {
                    "role": "user",
                    "content": user_prompt
                }
            ]
        });

        let response = self
            .client
            .post(API_URL)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    AbacusError::Timeout(format!("request to {API_URL} timed out"))
                } else {
                    AbacusError::Api(format!("API request failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(AbacusError::Api(format!("API error ({status}): {error_text}")));
        }

        let api_response: ApiResponse = response
            .json()
            .map_err(|e| AbacusError::Api(format!("Failed to parse API response: {e}")))?;

        api_response
            .content
            .into_iter()
            .find_map(|block| (block.content_type == "text").then_some(block.text))
            .ok_or_else(|| AbacusError::Api("No text in API response".to_string()))
    }
}

impl ReasoningProvider for AnthropicProvider {
    fn propose(
        &self,
        question: &str,
        overview: &str,
        transcript: &Transcript,
    ) -> Result<ProposedStep> {
        let response = self.send_message(&prompts::step_prompt(question, overview, transcript))?;
        parse_step(&response)
    }

    fn summarize(&self, question: &str, transcript: &Transcript) -> Result<String> {
        self.send_message(&prompts::summary_prompt(question, transcript))
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

/// Parse the model's structured step, tolerating a markdown code fence
/// around the JSON.
fn parse_step(response: &str) -> Result<ProposedStep> {
    let json_str = strip_code_fence(response);
    serde_json::from_str(json_str)
        .map_err(|e| AbacusError::Api(format!("Failed to parse proposed step: {e}")))
}

fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let inner = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest.split("```").next()
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest.split("```").next()
    } else {
        None
    };
    inner.map(str::trim).unwrap_or(trimmed)
}
