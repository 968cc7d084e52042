//! The agent loop: tool calls, the per-question transcript, and the
//! phase-machine session that drives them.

mod call;
mod session;
mod transcript;

pub use call::{ResolvedCall, ToolCall};
pub use session::{AgentSession, Answer, Completion, DEFAULT_MAX_STEPS};
pub use transcript::{Transcript, TranscriptEntry};
