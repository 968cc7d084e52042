//! Operation catalog contract tests through the execution engine.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::json;

use abacus::exec::Engine;
use abacus::workbook::{ColumnMeta, ColumnType, Table, Workbook};
use abacus::{FailureKind, NameResolver, OperationResult, ResultValue};

/// Workbook with one sheet covering all four column types.
fn orders_workbook() -> Arc<Workbook> {
    let mut sheets = IndexMap::new();
    sheets.insert(
        "Orders".to_string(),
        Table::new(
            vec![
                ColumnMeta::new("Customer", ColumnType::Text),
                ColumnMeta::new("Amount", ColumnType::Numeric),
                ColumnMeta::new("Placed", ColumnType::DateTime),
                ColumnMeta::new("Shipped", ColumnType::Boolean),
            ],
            vec![
                row(&["Acme", "120.5", "2024-01-10", "true"]),
                row(&["Basel", "80", "2024-02-01", "false"]),
                row(&["Acme", "40", "2024-02-15", "true"]),
                row(&["Corfu", "NA", "2024-03-01", "false"]),
            ],
        ),
    );
    Arc::new(Workbook::from_tables(sheets))
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|s| s.to_string()).collect()
}

/// Prepare and run one call, panicking on prepare-stage failures.
fn run(book: &Arc<Workbook>, name: &str, arguments: serde_json::Value) -> OperationResult {
    let engine = Engine::new();
    let resolver = NameResolver::new();
    let request = engine
        .prepare(name, &arguments)
        .unwrap_or_else(|failure| panic!("prepare failed: {failure:?}"));
    engine.run(book, &resolver, &request)
}

fn expect_table(result: OperationResult) -> Table {
    match result {
        OperationResult::Success {
            value: ResultValue::Table(table),
            ..
        } => table,
        other => panic!("expected table, got {other:?}"),
    }
}

// =============================================================================
// Schema Operations
// =============================================================================

#[test]
fn test_list_sheets_reports_counts() {
    let book = orders_workbook();
    let table = expect_table(run(&book, "list_sheets", json!({})));
    assert_eq!(table.rows, vec![row(&["Orders", "4", "4"])]);
}

#[test]
fn test_get_schema_reports_types() {
    let book = orders_workbook();
    let table = expect_table(run(&book, "get_schema", json!({"sheet": "Orders"})));
    assert_eq!(table.rows[1], row(&["Amount", "numeric"]));
    assert_eq!(table.rows[2], row(&["Placed", "datetime"]));
    assert_eq!(table.rows[3], row(&["Shipped", "boolean"]));
}

#[test]
fn test_find_column_fuzzy_ranks_candidates() {
    let book = orders_workbook();
    let table = expect_table(run(
        &book,
        "find_column_fuzzy",
        json!({"candidate": "amont", "sheet": "Orders"}),
    ));
    assert!(!table.rows.is_empty());
    assert_eq!(table.rows[0][1], "Amount");
}

// =============================================================================
// Filtering Across Types
// =============================================================================

#[test]
fn test_filter_datetime_ordering() {
    let book = orders_workbook();
    let table = expect_table(run(
        &book,
        "filter_rows",
        json!({
            "sheet": "Orders",
            "predicate": {"column": "Placed", "comparator": ">=", "value": "2024-02-01"}
        }),
    ));
    assert_eq!(table.row_count(), 3);
}

#[test]
fn test_filter_boolean_equality() {
    let book = orders_workbook();
    let table = expect_table(run(
        &book,
        "filter_rows",
        json!({
            "sheet": "Orders",
            "predicate": {"column": "Shipped", "comparator": "=", "value": true}
        }),
    ));
    assert_eq!(table.row_count(), 2);
}

#[test]
fn test_filter_text_contains() {
    let book = orders_workbook();
    let table = expect_table(run(
        &book,
        "filter_rows",
        json!({
            "sheet": "Orders",
            "predicate": {"column": "Customer", "comparator": "contains", "value": "cm"}
        }),
    ));
    assert_eq!(table.row_count(), 2);
}

#[test]
fn test_filter_contains_on_boolean_is_type_mismatch() {
    let book = orders_workbook();
    let result = run(
        &book,
        "filter_rows",
        json!({
            "sheet": "Orders",
            "predicate": {"column": "Shipped", "comparator": "contains", "value": "t"}
        }),
    );
    assert_eq!(result.failure_kind(), Some(FailureKind::TypeMismatch));
}

// =============================================================================
// Aggregation
// =============================================================================

#[test]
fn test_aggregate_skips_null_metric_cells() {
    let book = orders_workbook();
    let table = expect_table(run(
        &book,
        "aggregate",
        json!({
            "sheet": "Orders",
            "group_by": ["Customer"],
            "metric": "Amount",
            "aggregator": "sum"
        }),
    ));
    // Corfu's only amount is NA, so its group sums to 0.
    assert_eq!(table.rows[0], row(&["Acme", "160.5"]));
    assert_eq!(table.rows[1], row(&["Basel", "80"]));
    assert_eq!(table.rows[2], row(&["Corfu", "0"]));
}

#[test]
fn test_aggregate_mean_on_datetime_is_non_numeric() {
    let book = orders_workbook();
    let result = run(
        &book,
        "aggregate",
        json!({"sheet": "Orders", "metric": "Placed", "aggregator": "mean"}),
    );
    assert_eq!(result.failure_kind(), Some(FailureKind::NonNumericAggregate));
}

#[test]
fn test_aggregate_count_works_on_any_type() {
    let book = orders_workbook();
    let result = run(
        &book,
        "aggregate",
        json!({"sheet": "Orders", "metric": "Customer", "aggregator": "count"}),
    );
    match result {
        OperationResult::Success {
            value: ResultValue::Scalar { value },
            ..
        } => assert_eq!(value, 4.0),
        other => panic!("unexpected result: {other:?}"),
    }
}

// =============================================================================
// Pivoting
// =============================================================================

#[test]
fn test_pivot_counts_by_customer_and_shipped() {
    let book = orders_workbook();
    let table = expect_table(run(
        &book,
        "pivot_table",
        json!({
            "sheet": "Orders",
            "row_keys": ["Customer"],
            "column_keys": ["Shipped"],
            "value_column": "Amount",
            "aggregator": "count"
        }),
    ));
    assert_eq!(table.column_names(), vec!["Customer", "true", "false"]);
    // Acme shipped twice, never unshipped: the missing cell is filled.
    assert_eq!(table.rows[0], row(&["Acme", "2", "0"]));
}

// =============================================================================
// Engine Boundary
// =============================================================================

#[test]
fn test_unknown_operation_fails_at_prepare() {
    let engine = Engine::new();
    let failure = engine
        .prepare("export_to_sql", &json!({}))
        .expect_err("name outside the catalog");
    assert_eq!(failure.failure_kind(), Some(FailureKind::UnknownOperation));
}

#[test]
fn test_malformed_arguments_fail_at_prepare() {
    let engine = Engine::new();
    let failure = engine
        .prepare(
            "pivot_table",
            &json!({"sheet": "Orders", "row_keys": "Customer"}),
        )
        .expect_err("row_keys must be a list");
    assert_eq!(failure.failure_kind(), Some(FailureKind::InvalidArguments));
}
