//! Main Abacus struct and public API.

use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use crate::agent::{AgentSession, Answer, DEFAULT_MAX_STEPS};
use crate::error::{AbacusError, Result};
use crate::exec::Engine;
use crate::llm::{LlmConfig, ReasoningProvider};
use crate::resolve::{NameResolver, ResolverConfig};
use crate::workbook::{Loader, LoaderConfig, Workbook};

/// Configuration for Abacus sessions.
#[derive(Debug, Clone)]
pub struct AbacusConfig {
    /// Loader configuration.
    pub loader: LoaderConfig,
    /// Fuzzy resolver configuration.
    pub resolver: ResolverConfig,
    /// Reasoning provider configuration.
    pub llm: LlmConfig,
    /// Ceiling on tool-call steps per question.
    pub max_steps: usize,
    /// Per-operation execution deadline (None = no deadline).
    pub op_timeout: Option<Duration>,
}

impl Default for AbacusConfig {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            resolver: ResolverConfig::default(),
            llm: LlmConfig::default(),
            max_steps: DEFAULT_MAX_STEPS,
            op_timeout: None,
        }
    }
}

/// The main entry point: a workbook snapshot plus a reasoning provider,
/// answering one question per agent-loop session.
pub struct Abacus {
    book: Arc<Workbook>,
    config: AbacusConfig,
    provider: Option<Arc<dyn ReasoningProvider>>,
}

impl Abacus {
    /// Open a workbook from a CSV/TSV file or a directory of them.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, AbacusConfig::default())
    }

    /// Open a workbook with custom configuration.
    pub fn open_with_config(path: impl AsRef<Path>, config: AbacusConfig) -> Result<Self> {
        let book = Loader::with_config(config.loader.clone()).load(path)?;
        Ok(Self {
            book: Arc::new(book),
            config,
            provider: None,
        })
    }

    /// Wrap an already-built workbook (ingestion collaborator path).
    pub fn from_workbook(book: Workbook) -> Self {
        Self {
            book: Arc::new(book),
            config: AbacusConfig::default(),
            provider: None,
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: AbacusConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach the reasoning provider used to drive sessions.
    pub fn with_provider(mut self, provider: impl ReasoningProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// The current workbook snapshot.
    pub fn workbook(&self) -> &Arc<Workbook> {
        &self.book
    }

    /// Replace the workbook with a freshly loaded snapshot.
    ///
    /// In-flight sessions keep the `Arc` they started with; nothing is
    /// mutated in place.
    pub fn reload(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let book = Loader::with_config(self.config.loader.clone()).load(path)?;
        self.book = Arc::new(book);
        Ok(())
    }

    /// Answer one question.
    pub fn ask(&self, question: &str) -> Result<Answer> {
        self.session()?.run(question)
    }

    /// Answer one question with a cancellation token attached.
    pub fn ask_with_cancel(&self, question: &str, cancel: Arc<AtomicBool>) -> Result<Answer> {
        self.session()?.with_cancel(cancel).run(question)
    }

    fn session(&self) -> Result<AgentSession> {
        let provider = self.provider.clone().ok_or_else(|| {
            AbacusError::Config("no reasoning provider configured".to_string())
        })?;
        Ok(AgentSession::new(
            Arc::clone(&self.book),
            provider,
            NameResolver::with_config(self.config.resolver.clone()),
            Engine::with_timeout(self.config.op_timeout),
            self.config.max_steps,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ProposedStep, ScriptedProvider};
    use crate::workbook::{ColumnMeta, ColumnType, Table};
    use indexmap::IndexMap;

    fn workbook() -> Workbook {
        let mut sheets = IndexMap::new();
        sheets.insert(
            "Sales".to_string(),
            Table::new(
                vec![ColumnMeta::new("Revenue", ColumnType::Numeric)],
                vec![vec!["100".to_string()]],
            ),
        );
        Workbook::from_tables(sheets)
    }

    #[test]
    fn test_ask_requires_provider() {
        let abacus = Abacus::from_workbook(workbook());
        assert!(matches!(
            abacus.ask("anything?"),
            Err(AbacusError::Config(_))
        ));
    }

    #[test]
    fn test_ask_with_scripted_provider() {
        let abacus = Abacus::from_workbook(workbook()).with_provider(ScriptedProvider::new(
            vec![ProposedStep::FinalAnswer {
                answer: "42".to_string(),
            }],
        ));
        let answer = abacus.ask("anything?").unwrap();
        assert_eq!(answer.text, "42");
    }
}
