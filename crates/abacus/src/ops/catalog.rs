//! The fixed operation catalog: name lookup, argument parsing, dispatch,
//! and the JSON tool schemas published to the reasoning capability.

use serde_json::{json, Value};

use crate::resolve::NameResolver;
use crate::workbook::Workbook;

use super::request::{args, OpRequest};
use super::result::{FailureKind, OperationResult};
use super::{aggregate, filter, pivot, schema_info};

/// Names of every operation in the catalog.
pub const OPERATION_NAMES: &[&str] = &[
    "list_sheets",
    "get_schema",
    "filter_rows",
    "aggregate",
    "pivot_table",
    "find_column_fuzzy",
];

/// Parse a tool call's name and raw arguments into a typed request.
///
/// This is the only path by which a malformed call from the reasoning
/// capability becomes a recoverable failure instead of a crash: names
/// outside the catalog map to `UnknownOperation`, malformed argument
/// shapes to `InvalidArguments` naming the offending field.
pub fn parse(name: &str, arguments: &Value) -> Result<OpRequest, OperationResult> {
    let invalid = |e: serde_json::Error| {
        OperationResult::failure(
            FailureKind::InvalidArguments,
            format!("invalid arguments for {name}: {e}"),
        )
    };

    match name {
        "list_sheets" => Ok(OpRequest::ListSheets),
        "get_schema" => {
            let parsed: args::GetSchemaArgs =
                serde_json::from_value(arguments.clone()).map_err(invalid)?;
            Ok(OpRequest::GetSchema { sheet: parsed.sheet })
        }
        "filter_rows" => {
            let parsed: args::FilterRowsArgs =
                serde_json::from_value(arguments.clone()).map_err(invalid)?;
            Ok(OpRequest::FilterRows {
                sheet: parsed.sheet,
                predicate: parsed.predicate,
            })
        }
        "aggregate" => {
            let parsed: args::AggregateArgs =
                serde_json::from_value(arguments.clone()).map_err(invalid)?;
            Ok(OpRequest::Aggregate {
                sheet: parsed.sheet,
                group_by: parsed.group_by,
                metric: parsed.metric,
                aggregator: parsed.aggregator,
            })
        }
        "pivot_table" => {
            let parsed: args::PivotTableArgs =
                serde_json::from_value(arguments.clone()).map_err(invalid)?;
            Ok(OpRequest::PivotTable {
                sheet: parsed.sheet,
                row_keys: parsed.row_keys,
                column_keys: parsed.column_keys,
                value_column: parsed.value_column,
                aggregator: parsed.aggregator,
            })
        }
        "find_column_fuzzy" => {
            let parsed: args::FindColumnArgs =
                serde_json::from_value(arguments.clone()).map_err(invalid)?;
            Ok(OpRequest::FindColumn {
                candidate: parsed.candidate,
                sheet: parsed.sheet,
            })
        }
        other => Err(OperationResult::failure(
            FailureKind::UnknownOperation,
            format!(
                "'{other}' is not a catalog operation; available: {}",
                OPERATION_NAMES.join(", ")
            ),
        )),
    }
}

/// Run a typed request against a workbook snapshot.
///
/// Pure with respect to shared state: every operation only reads the
/// workbook. Identifier arguments are expected to be resolver output.
pub fn dispatch(book: &Workbook, resolver: &NameResolver, request: &OpRequest) -> OperationResult {
    match request {
        OpRequest::ListSheets => schema_info::list_sheets(book),
        OpRequest::GetSchema { sheet } => schema_info::get_schema(book, sheet),
        OpRequest::FilterRows { sheet, predicate } => {
            filter::filter_rows(book, sheet, predicate)
        }
        OpRequest::Aggregate {
            sheet,
            group_by,
            metric,
            aggregator,
        } => aggregate::aggregate(book, sheet, group_by, metric, *aggregator),
        OpRequest::PivotTable {
            sheet,
            row_keys,
            column_keys,
            value_column,
            aggregator,
        } => pivot::pivot_table(book, sheet, row_keys, column_keys, value_column, *aggregator),
        OpRequest::FindColumn { candidate, sheet } => {
            schema_info::find_column(book, resolver, candidate, sheet.as_deref())
        }
    }
}

/// JSON description of every catalog operation, embedded in the system
/// prompt so the reasoning capability knows the exact call shapes.
pub fn tool_schemas() -> Value {
    json!([
        {
            "name": "list_sheets",
            "description": "List every sheet in the workbook with row and column counts.",
            "arguments": {}
        },
        {
            "name": "get_schema",
            "description": "List the columns of one sheet with their inferred types.",
            "arguments": {"sheet": "sheet name"}
        },
        {
            "name": "filter_rows",
            "description": "Return the rows of a sheet matching a single-column predicate.",
            "arguments": {
                "sheet": "sheet name",
                "predicate": {
                    "column": "column name",
                    "comparator": "one of =, !=, <, <=, >, >=, contains",
                    "value": "comparison value (number, string, or boolean)"
                }
            }
        },
        {
            "name": "aggregate",
            "description": "Aggregate a metric column, optionally grouped. Empty group_by yields a single value.",
            "arguments": {
                "sheet": "sheet name",
                "group_by": "list of column names (may be empty)",
                "metric": "column to aggregate",
                "aggregator": "one of sum, mean, min, max, count"
            }
        },
        {
            "name": "pivot_table",
            "description": "Reshape a sheet: row_keys down, column_keys across, aggregated value_column in the cells.",
            "arguments": {
                "sheet": "sheet name",
                "row_keys": "list of column names",
                "column_keys": "list of column names (may be empty)",
                "value_column": "column to aggregate",
                "aggregator": "one of sum, mean, min, max, count"
            }
        },
        {
            "name": "find_column_fuzzy",
            "description": "Rank actual column names against an approximate name. Use when unsure a column exists.",
            "arguments": {
                "candidate": "approximate column name",
                "sheet": "optional sheet name to restrict the search"
            }
        }
    ])
}
