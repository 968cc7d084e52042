//! Tool calls as issued by the reasoning capability, and their resolved
//! form.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ops::OpRequest;
use crate::resolve::Resolution;

/// A structured request naming one catalog operation plus arguments.
/// Immutable once issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Operation name (validated against the catalog by the engine).
    pub name: String,
    /// Raw arguments as produced by the reasoning capability.
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    /// Create a tool call.
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// A tool call whose identifier arguments have all been verified against
/// the workbook, with one resolution record per identifier.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedCall {
    /// Operation name.
    pub name: String,
    /// Per-identifier resolution records, in argument order.
    pub resolutions: Vec<Resolution>,
    /// The rewritten, typed request handed to the engine.
    #[serde(skip)]
    pub request: OpRequest,
}

impl ResolvedCall {
    /// Create a resolved call.
    pub fn new(request: OpRequest, resolutions: Vec<Resolution>) -> Self {
        Self {
            name: request.name().to_string(),
            resolutions,
            request,
        }
    }

    /// Render the non-trivial resolutions for the transcript, e.g.
    /// `'Revenu' -> 'Revenue' (97)`.
    pub fn describe_resolutions(&self) -> Option<String> {
        let rewrites: Vec<String> = self
            .resolutions
            .iter()
            .filter(|r| r.original != r.resolved)
            .map(|r| format!("'{}' -> '{}' ({:.0})", r.original, r.resolved, r.score))
            .collect();
        if rewrites.is_empty() {
            None
        } else {
            Some(rewrites.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_call_deserializes_without_arguments() {
        let call: ToolCall = serde_json::from_value(json!({"name": "list_sheets"})).unwrap();
        assert_eq!(call.name, "list_sheets");
        assert!(call.arguments.is_null());
    }

    #[test]
    fn test_describe_resolutions_skips_exact() {
        let resolved = ResolvedCall::new(
            OpRequest::GetSchema {
                sheet: "Sales".to_string(),
            },
            vec![
                Resolution {
                    original: "Sales".to_string(),
                    resolved: "Sales".to_string(),
                    score: 100.0,
                    alternatives: vec![],
                },
                Resolution {
                    original: "Salez".to_string(),
                    resolved: "Sales".to_string(),
                    score: 93.0,
                    alternatives: vec![],
                },
            ],
        );
        let described = resolved.describe_resolutions().unwrap();
        assert_eq!(described, "'Salez' -> 'Sales' (93)");
    }
}
