//! Operation outcomes: the tagged success/failure result appended to the
//! transcript after every executed call.

use serde::{Deserialize, Serialize};

use crate::workbook::{format_number, Table};

/// Kind of operation failure.
///
/// Every failure a data operation, the resolver, or the execution engine
/// can produce is one of these; nothing else crosses the engine boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The named sheet does not exist in the workbook.
    UnknownSheet,
    /// The named column does not exist in the sheet.
    UnknownColumn,
    /// A comparator was applied to a column type it cannot compare.
    TypeMismatch,
    /// sum/mean/min/max requested over a non-numeric column.
    NonNumericAggregate,
    /// A pivot produced no rows at all.
    EmptyResult,
    /// An identifier could not be resolved to exactly one registry name.
    AmbiguousReference,
    /// The tool call named an operation outside the catalog.
    UnknownOperation,
    /// The tool call's arguments were missing or malformed.
    InvalidArguments,
    /// A reasoning request or operation exceeded its deadline.
    Timeout,
    /// The agent loop hit its step ceiling.
    StepLimitExceeded,
    /// An unexpected fault inside an operation, contained by the engine.
    InternalError,
}

impl FailureKind {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::UnknownSheet => "unknown sheet",
            FailureKind::UnknownColumn => "unknown column",
            FailureKind::TypeMismatch => "type mismatch",
            FailureKind::NonNumericAggregate => "non-numeric aggregate",
            FailureKind::EmptyResult => "empty result",
            FailureKind::AmbiguousReference => "ambiguous reference",
            FailureKind::UnknownOperation => "unknown operation",
            FailureKind::InvalidArguments => "invalid arguments",
            FailureKind::Timeout => "timeout",
            FailureKind::StepLimitExceeded => "step limit exceeded",
            FailureKind::InternalError => "internal error",
        }
    }

    /// Failures that force the loop to finalize instead of retrying.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FailureKind::StepLimitExceeded | FailureKind::InternalError
        )
    }
}

/// The payload of a successful operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResultValue {
    /// A tabular result.
    Table(Table),
    /// A single numeric result.
    Scalar { value: f64 },
    /// A textual result.
    Text { text: String },
}

/// Tagged outcome of one operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OperationResult {
    Success {
        value: ResultValue,
        summary: String,
    },
    Failure {
        kind: FailureKind,
        message: String,
    },
}

impl OperationResult {
    /// Build a success result.
    pub fn success(value: ResultValue, summary: impl Into<String>) -> Self {
        OperationResult::Success {
            value,
            summary: summary.into(),
        }
    }

    /// Build a failure result.
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        OperationResult::Failure {
            kind,
            message: message.into(),
        }
    }

    /// True for failures.
    pub fn is_failure(&self) -> bool {
        matches!(self, OperationResult::Failure { .. })
    }

    /// The failure kind, if this is a failure.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            OperationResult::Failure { kind, .. } => Some(*kind),
            OperationResult::Success { .. } => None,
        }
    }

    /// Render the outcome for the transcript and the reasoning prompt,
    /// truncating tabular payloads to a preview.
    pub fn render(&self, max_rows: usize) -> String {
        match self {
            OperationResult::Success { value, summary } => match value {
                ResultValue::Table(table) => {
                    format!("{summary}\n{}", table.render_preview(max_rows))
                }
                ResultValue::Scalar { value } => {
                    format!("{summary}\nvalue: {}", format_number(*value))
                }
                ResultValue::Text { text } => format!("{summary}\n{text}"),
            },
            OperationResult::Failure { kind, message } => {
                format!("FAILED ({}): {message}", kind.label())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_serde_names() {
        let json = serde_json::to_string(&FailureKind::NonNumericAggregate).unwrap();
        assert_eq!(json, "\"non_numeric_aggregate\"");
        let json = serde_json::to_string(&FailureKind::AmbiguousReference).unwrap();
        assert_eq!(json, "\"ambiguous_reference\"");
    }

    #[test]
    fn test_fatal_kinds() {
        assert!(FailureKind::InternalError.is_fatal());
        assert!(FailureKind::StepLimitExceeded.is_fatal());
        assert!(!FailureKind::Timeout.is_fatal());
        assert!(!FailureKind::AmbiguousReference.is_fatal());
    }

    #[test]
    fn test_render_scalar() {
        let result = OperationResult::success(
            ResultValue::Scalar { value: 350.0 },
            "sum of Revenue",
        );
        let rendered = result.render(5);
        assert!(rendered.contains("sum of Revenue"));
        assert!(rendered.contains("value: 350"));
    }

    #[test]
    fn test_render_failure() {
        let result = OperationResult::failure(FailureKind::UnknownSheet, "no sheet 'Sale'");
        assert_eq!(result.render(5), "FAILED (unknown sheet): no sheet 'Sale'");
    }
}
