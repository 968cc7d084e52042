//! The agent loop: a phase machine driving repeated
//! (select-operation, resolve-arguments, execute, observe) cycles until
//! a termination condition.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{AbacusError, Result};
use crate::exec::Engine;
use crate::llm::{ProposedStep, ReasoningProvider};
use crate::ops::{FailureKind, OperationResult};
use crate::resolve::{resolve_request, NameResolver};
use crate::workbook::Workbook;

use super::call::{ResolvedCall, ToolCall};
use super::transcript::Transcript;

/// Default ceiling on tool-call steps per question.
pub const DEFAULT_MAX_STEPS: usize = 10;

/// Loop phase. One session moves Thinking → Resolving → Executing →
/// Observing and back, until Finalizing → Done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Thinking,
    Resolving,
    Executing,
    Observing,
    Finalizing,
    Done,
}

/// How the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    /// The reasoning capability produced an answer on its own.
    Answered,
    /// The step ceiling was reached before an answer.
    StepLimitExceeded,
    /// An internal fault forced finalization.
    Aborted,
}

/// The final product of one question.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    /// Answer text, including any trailing condition notes.
    pub text: String,
    /// How the session ended.
    pub completion: Completion,
    /// Tool-call steps consumed.
    pub steps: usize,
    /// Full audit transcript.
    pub transcript: Transcript,
}

/// One agent loop instance, serving exactly one question end-to-end.
///
/// Sessions share only the immutable workbook snapshot and the provider;
/// independent questions can run as independent sessions in parallel.
pub struct AgentSession {
    book: Arc<Workbook>,
    provider: Arc<dyn ReasoningProvider>,
    resolver: NameResolver,
    engine: Engine,
    max_steps: usize,
    cancel: Option<Arc<AtomicBool>>,
}

impl AgentSession {
    /// Create a session over a workbook snapshot.
    pub fn new(
        book: Arc<Workbook>,
        provider: Arc<dyn ReasoningProvider>,
        resolver: NameResolver,
        engine: Engine,
        max_steps: usize,
    ) -> Self {
        Self {
            book,
            provider,
            resolver,
            engine,
            max_steps,
            cancel: None,
        }
    }

    /// Attach a cancellation token, checked at every phase boundary.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Run the loop for one question until `Done`.
    pub fn run(&self, question: &str) -> Result<Answer> {
        let overview = self.book.overview();
        let mut transcript = Transcript::new();
        let mut phase = Phase::Thinking;
        let mut steps = 0usize;
        let mut completion = Completion::Answered;
        let mut final_text: Option<String> = None;
        let mut pending_call: Option<ToolCall> = None;
        let mut pending_resolved: Option<ResolvedCall> = None;

        while phase != Phase::Done {
            if let Some(cancel) = &self.cancel {
                if cancel.load(Ordering::Relaxed) {
                    debug!(provider = self.provider.name(), "question cancelled");
                    return Err(AbacusError::Cancelled);
                }
            }

            phase = match phase {
                Phase::Thinking => {
                    match self.provider.propose(question, &overview, &transcript) {
                        Ok(ProposedStep::FinalAnswer { answer }) => {
                            debug!("provider signalled a final answer");
                            final_text = Some(answer);
                            Phase::Finalizing
                        }
                        Ok(step @ ProposedStep::ToolCall { .. }) => {
                            steps += 1;
                            pending_call = step.into_tool_call();
                            Phase::Resolving
                        }
                        Err(AbacusError::Timeout(message)) => {
                            steps += 1;
                            warn!(%message, "reasoning request timed out");
                            transcript.push(
                                None,
                                None,
                                OperationResult::failure(FailureKind::Timeout, message),
                            );
                            Phase::Observing
                        }
                        Err(e) => {
                            steps += 1;
                            warn!(error = %e, "reasoning request failed");
                            transcript.push(
                                None,
                                None,
                                OperationResult::failure(
                                    FailureKind::InternalError,
                                    e.to_string(),
                                ),
                            );
                            Phase::Observing
                        }
                    }
                }

                Phase::Resolving => {
                    let call = pending_call.take().expect("Resolving without a call");
                    match self.engine.prepare(&call.name, &call.arguments) {
                        Err(failure) => {
                            transcript.push(Some(call), None, failure);
                            Phase::Observing
                        }
                        Ok(request) => {
                            match resolve_request(&self.book, &self.resolver, request) {
                                // Resolution misses skip execution entirely.
                                Err(failure) => {
                                    transcript.push(Some(call), None, failure);
                                    Phase::Observing
                                }
                                Ok((request, records)) => {
                                    pending_call = Some(call);
                                    pending_resolved =
                                        Some(ResolvedCall::new(request, records));
                                    Phase::Executing
                                }
                            }
                        }
                    }
                }

                Phase::Executing => {
                    let call = pending_call.take().expect("Executing without a call");
                    let resolved = pending_resolved
                        .take()
                        .expect("Executing without a resolved call");
                    let result = self.engine.run(&self.book, &self.resolver, &resolved.request);
                    debug!(
                        operation = resolved.name.as_str(),
                        failed = result.is_failure(),
                        "operation executed"
                    );
                    transcript.push(Some(call), Some(resolved), result);
                    Phase::Observing
                }

                Phase::Observing => {
                    let fatal = transcript
                        .trailing_failure()
                        .map(|kind| kind.is_fatal())
                        .unwrap_or(false);
                    if fatal {
                        completion = Completion::Aborted;
                        Phase::Finalizing
                    } else if steps >= self.max_steps {
                        completion = Completion::StepLimitExceeded;
                        Phase::Finalizing
                    } else {
                        Phase::Thinking
                    }
                }

                Phase::Finalizing => {
                    let base = match final_text.take() {
                        Some(text) => text,
                        None => self
                            .provider
                            .summarize(question, &transcript)
                            .unwrap_or_else(|e| {
                                warn!(error = %e, "summarization failed; using fallback");
                                fallback_summary(&transcript)
                            }),
                    };
                    final_text = Some(compose_answer(
                        base,
                        completion,
                        self.max_steps,
                        &transcript,
                    ));
                    Phase::Done
                }

                Phase::Done => Phase::Done,
            };
        }

        let text = final_text.unwrap_or_default();
        info!(
            provider = self.provider.name(),
            steps,
            completion = ?completion,
            "question answered"
        );
        Ok(Answer {
            text,
            completion,
            steps,
            transcript,
        })
    }
}

/// Append human-readable notes for unresolved trailing failures and for
/// hitting the step ceiling, so a confident-but-wrong answer is never
/// presented bare.
fn compose_answer(
    base: String,
    completion: Completion,
    max_steps: usize,
    transcript: &Transcript,
) -> String {
    let mut text = base;
    if completion == Completion::StepLimitExceeded {
        text.push_str(&format!(
            "\n\nNote: stopped after reaching the {max_steps}-step limit without a conclusive answer."
        ));
    }
    if let Some(OperationResult::Failure { kind, message }) =
        transcript.entries.last().map(|e| &e.result)
    {
        text.push_str(&format!(
            "\n\nNote: the last operation did not complete ({}: {message}).",
            kind.label()
        ));
    }
    text
}

/// Deterministic answer used when even summarization is unavailable.
fn fallback_summary(transcript: &Transcript) -> String {
    if transcript.is_empty() {
        "No answer could be produced: no operations were executed.".to_string()
    } else {
        format!(
            "No answer could be produced. {} step(s) were executed; see the transcript for their results.",
            transcript.len()
        )
    }
}
