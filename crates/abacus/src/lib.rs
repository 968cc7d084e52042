//! Abacus: natural-language questions over tabular spreadsheet data.
//!
//! Abacus turns a question into a sequence of deterministic data
//! operations (filter, aggregate, pivot, schema lookup) chosen by an
//! injected reasoning capability, and a final answer. Misspelled or
//! ambiguous sheet/column references are tolerated through fuzzy
//! resolution against the actual schema.
//!
//! # Core Principles
//!
//! - **Closed operation catalog**: every operation takes a validated,
//!   typed argument schema; there is no open-ended code execution.
//! - **Read-only data**: a workbook is an immutable snapshot; every
//!   operation is a pure read.
//! - **Failures are data**: every operation failure lands in the
//!   transcript and informs the next step instead of aborting.
//!
//! # Example
//!
//! ```no_run
//! use abacus::{Abacus, AnthropicProvider};
//!
//! let provider = AnthropicProvider::from_env().unwrap();
//! let abacus = Abacus::open("sales.csv").unwrap().with_provider(provider);
//!
//! let answer = abacus.ask("total revenue by region").unwrap();
//! println!("{}", answer.text);
//! ```

pub mod agent;
pub mod error;
pub mod exec;
pub mod llm;
pub mod ops;
pub mod resolve;
pub mod workbook;

mod abacus;

pub use crate::abacus::{Abacus, AbacusConfig};
pub use agent::{AgentSession, Answer, Completion, ResolvedCall, ToolCall, Transcript};
pub use error::{AbacusError, Result};
pub use llm::{AnthropicProvider, LlmConfig, ProposedStep, ReasoningProvider, ScriptedProvider};
pub use ops::{Aggregator, Comparator, FailureKind, OperationResult, ResultValue};
pub use resolve::{NameResolver, ResolverConfig};
pub use workbook::{ColumnMeta, ColumnType, Loader, LoaderConfig, Table, Workbook};
