//! The per-question transcript: every call, its resolution, and its
//! outcome, in order.

use serde::Serialize;

use crate::ops::{FailureKind, OperationResult};

use super::call::{ResolvedCall, ToolCall};

/// Rows shown per table when rendering results into a prompt.
const PREVIEW_ROWS: usize = 8;

/// One step of the transcript.
///
/// `call` is None for failures that happened before any tool call
/// existed (a reasoning request that timed out or faulted).
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call: Option<ToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<ResolvedCall>,
    pub result: OperationResult,
}

/// Ordered history of calls and results for one question.
///
/// Grows monotonically while the loop runs; owned exclusively by the
/// session handling the question; dropped with it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    pub entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one step.
    pub fn push(
        &mut self,
        call: Option<ToolCall>,
        resolved: Option<ResolvedCall>,
        result: OperationResult,
    ) {
        self.entries.push(TranscriptEntry {
            call,
            resolved,
            result,
        });
    }

    /// Number of steps recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The failure kind of the last entry, if the transcript ends in one.
    pub fn trailing_failure(&self) -> Option<FailureKind> {
        self.entries.last().and_then(|e| e.result.failure_kind())
    }

    /// Render the transcript for the reasoning prompt.
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return "(no operations executed yet)".to_string();
        }
        let mut out = String::new();
        for (idx, entry) in self.entries.iter().enumerate() {
            let heading = match &entry.call {
                Some(call) => format!(
                    "Step {}: {} {}",
                    idx + 1,
                    call.name,
                    serde_json::to_string(&call.arguments).unwrap_or_default()
                ),
                None => format!("Step {}: (no tool call)", idx + 1),
            };
            out.push_str(&heading);
            out.push('\n');
            if let Some(described) = entry
                .resolved
                .as_ref()
                .and_then(|r| r.describe_resolutions())
            {
                out.push_str(&format!("  resolved: {described}\n"));
            }
            for line in entry.result.render(PREVIEW_ROWS).lines() {
                out.push_str("  ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{FailureKind, ResultValue};
    use serde_json::json;

    #[test]
    fn test_render_includes_steps_and_outcomes() {
        let mut transcript = Transcript::new();
        transcript.push(
            Some(ToolCall::new("list_sheets", json!({}))),
            None,
            OperationResult::success(
                ResultValue::Text {
                    text: "Sales".to_string(),
                },
                "1 sheet(s)",
            ),
        );
        transcript.push(
            Some(ToolCall::new("get_schema", json!({"sheet": "Salez"}))),
            None,
            OperationResult::failure(FailureKind::UnknownSheet, "no sheet named 'Salez'"),
        );

        let rendered = transcript.render();
        assert!(rendered.contains("Step 1: list_sheets"));
        assert!(rendered.contains("Step 2: get_schema"));
        assert!(rendered.contains("FAILED (unknown sheet)"));
        assert_eq!(transcript.trailing_failure(), Some(FailureKind::UnknownSheet));
    }

    #[test]
    fn test_empty_render() {
        assert!(Transcript::new().render().contains("no operations"));
    }
}
