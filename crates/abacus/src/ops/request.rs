//! Typed operation requests, parsed from tool-call arguments.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Row-filter comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "=", alias = "==", alias = "eq")]
    Eq,
    #[serde(rename = "!=", alias = "≠", alias = "ne")]
    Ne,
    #[serde(rename = "<", alias = "lt")]
    Lt,
    #[serde(rename = "<=", alias = "≤", alias = "le")]
    Le,
    #[serde(rename = ">", alias = "gt")]
    Gt,
    #[serde(rename = ">=", alias = "≥", alias = "ge")]
    Ge,
    #[serde(rename = "contains")]
    Contains,
}

impl Comparator {
    /// Display form used in summaries and failure messages.
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Ne => "!=",
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
            Comparator::Contains => "contains",
        }
    }

    /// True for the ordering comparators.
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            Comparator::Lt | Comparator::Le | Comparator::Gt | Comparator::Ge
        )
    }
}

/// A single-column row predicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Predicate {
    pub column: String,
    pub comparator: Comparator,
    pub value: Value,
}

/// Aggregation function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregator {
    Sum,
    Mean,
    Min,
    Max,
    Count,
}

impl Aggregator {
    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Aggregator::Sum => "sum",
            Aggregator::Mean => "mean",
            Aggregator::Min => "min",
            Aggregator::Max => "max",
            Aggregator::Count => "count",
        }
    }

    /// True when the metric column must be numeric.
    pub fn requires_numeric(&self) -> bool {
        !matches!(self, Aggregator::Count)
    }
}

/// A validated, typed operation request.
///
/// Identifier fields (sheet and column names) are raw caller text until
/// the resolver rewrites them; the execution engine only ever sees the
/// rewritten form.
#[derive(Debug, Clone)]
pub enum OpRequest {
    ListSheets,
    GetSchema {
        sheet: String,
    },
    FilterRows {
        sheet: String,
        predicate: Predicate,
    },
    Aggregate {
        sheet: String,
        group_by: Vec<String>,
        metric: String,
        aggregator: Aggregator,
    },
    PivotTable {
        sheet: String,
        row_keys: Vec<String>,
        column_keys: Vec<String>,
        value_column: String,
        aggregator: Aggregator,
    },
    FindColumn {
        candidate: String,
        sheet: Option<String>,
    },
}

impl OpRequest {
    /// The catalog name of this operation.
    pub fn name(&self) -> &'static str {
        match self {
            OpRequest::ListSheets => "list_sheets",
            OpRequest::GetSchema { .. } => "get_schema",
            OpRequest::FilterRows { .. } => "filter_rows",
            OpRequest::Aggregate { .. } => "aggregate",
            OpRequest::PivotTable { .. } => "pivot_table",
            OpRequest::FindColumn { .. } => "find_column_fuzzy",
        }
    }
}

/// Argument shapes as they appear in tool-call JSON.
pub(crate) mod args {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct GetSchemaArgs {
        pub sheet: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct FilterRowsArgs {
        pub sheet: String,
        pub predicate: Predicate,
    }

    #[derive(Debug, Deserialize)]
    pub struct AggregateArgs {
        pub sheet: String,
        #[serde(default)]
        pub group_by: Vec<String>,
        pub metric: String,
        pub aggregator: Aggregator,
    }

    #[derive(Debug, Deserialize)]
    pub struct PivotTableArgs {
        pub sheet: String,
        pub row_keys: Vec<String>,
        pub column_keys: Vec<String>,
        pub value_column: String,
        pub aggregator: Aggregator,
    }

    #[derive(Debug, Deserialize)]
    pub struct FindColumnArgs {
        pub candidate: String,
        #[serde(default)]
        pub sheet: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparator_serde() {
        let c: Comparator = serde_json::from_str("\">=\"").unwrap();
        assert_eq!(c, Comparator::Ge);
        let c: Comparator = serde_json::from_str("\"≠\"").unwrap();
        assert_eq!(c, Comparator::Ne);
        let c: Comparator = serde_json::from_str("\"contains\"").unwrap();
        assert_eq!(c, Comparator::Contains);
        assert!(serde_json::from_str::<Comparator>("\"like\"").is_err());
    }

    #[test]
    fn test_aggregator_serde() {
        let a: Aggregator = serde_json::from_str("\"mean\"").unwrap();
        assert_eq!(a, Aggregator::Mean);
        assert!(a.requires_numeric());
        let a: Aggregator = serde_json::from_str("\"count\"").unwrap();
        assert!(!a.requires_numeric());
    }

    #[test]
    fn test_aggregate_args_default_group_by() {
        let parsed: args::AggregateArgs = serde_json::from_value(serde_json::json!({
            "sheet": "Sales",
            "metric": "Revenue",
            "aggregator": "sum"
        }))
        .unwrap();
        assert!(parsed.group_by.is_empty());
    }
}
