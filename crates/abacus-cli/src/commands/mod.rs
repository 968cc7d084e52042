//! Command implementations.

pub mod ask;
pub mod chat;
pub mod sheets;

use std::path::Path;

use tracing_subscriber::EnvFilter;

use abacus::{Abacus, AbacusConfig, AnthropicProvider, ProposedStep, Result, ScriptedProvider};

use crate::cli::ProviderChoice;

/// Initialize tracing; `--verbose` raises the default level to debug.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "abacus=debug" } else { "abacus=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Load the workbook and attach the selected provider.
pub fn build_abacus(
    file: &Path,
    provider: ProviderChoice,
    max_steps: Option<usize>,
) -> Result<Abacus> {
    // Pick up ANTHROPIC_API_KEY from a .env file if present.
    dotenvy::dotenv().ok();

    let mut config = AbacusConfig::default();
    if let Some(max_steps) = max_steps {
        config.max_steps = max_steps;
    }

    let abacus = Abacus::open_with_config(file, config)?;
    Ok(match provider {
        ProviderChoice::Anthropic => abacus.with_provider(AnthropicProvider::from_env()?),
        ProviderChoice::Scripted => abacus.with_provider(smoke_provider()),
    })
}

/// A canned provider for offline smoke runs: inspect the workbook, then
/// explain that no model is attached.
fn smoke_provider() -> ScriptedProvider {
    ScriptedProvider::new(vec![ProposedStep::ToolCall {
        name: "list_sheets".to_string(),
        arguments: serde_json::json!({}),
    }])
    .with_fallback_answer(
        "Scripted provider: the workbook was inspected, but answering questions \
         requires the anthropic provider.",
    )
}
