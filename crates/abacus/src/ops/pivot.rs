//! Pivot-table reshaping.

use indexmap::{IndexMap, IndexSet};

use crate::workbook::{format_number, parse_number, ColumnMeta, ColumnType, Table, Workbook};

use super::aggregate::{lookup, reduce};
use super::request::Aggregator;
use super::result::{FailureKind, OperationResult, ResultValue};

/// Fill for row/column combinations with no contributing rows.
const FILL_VALUE: &str = "0";

/// Reshape `sheet`: one output row per distinct `row_keys` combination,
/// one value column per distinct `column_keys` combination, each cell the
/// aggregate of `value_column` over the intersection.
pub fn pivot_table(
    book: &Workbook,
    sheet: &str,
    row_keys: &[String],
    column_keys: &[String],
    value_column: &str,
    aggregator: Aggregator,
) -> OperationResult {
    let all_keys: Vec<String> = row_keys.iter().chain(column_keys).cloned().collect();
    let (table, key_indices, value_idx) =
        match lookup(book, sheet, &all_keys, value_column, aggregator) {
            Ok(located) => located,
            Err(failure) => return failure,
        };
    if row_keys.is_empty() {
        return OperationResult::failure(
            FailureKind::InvalidArguments,
            "pivot_table requires at least one row key".to_string(),
        );
    }

    let (row_indices, col_indices) = key_indices.split_at(row_keys.len());

    // Accumulate values per (row combination, column combination), both
    // in first-seen order. Rows with a null in any key are skipped.
    let mut col_labels: IndexSet<String> = IndexSet::new();
    let mut cells: IndexMap<Vec<String>, IndexMap<String, Vec<f64>>> = IndexMap::new();

    for row in &table.rows {
        let row_key: Vec<String> = row_indices
            .iter()
            .map(|&i| row.get(i).cloned().unwrap_or_default())
            .collect();
        let col_key: Vec<String> = col_indices
            .iter()
            .map(|&i| row.get(i).cloned().unwrap_or_default())
            .collect();
        if row_key.iter().chain(&col_key).any(|k| Table::is_null_value(k)) {
            continue;
        }
        let label = if col_key.is_empty() {
            value_column.to_string()
        } else {
            col_key.join("/")
        };
        col_labels.insert(label.clone());

        let cell = row.get(value_idx).map(|s| s.as_str()).unwrap_or("");
        let bucket = cells.entry(row_key).or_default().entry(label).or_default();
        if !Table::is_null_value(cell) {
            match aggregator {
                Aggregator::Count => bucket.push(1.0),
                _ => {
                    if let Some(n) = parse_number(cell) {
                        bucket.push(n);
                    }
                }
            }
        }
    }

    if cells.is_empty() {
        return OperationResult::failure(
            FailureKind::EmptyResult,
            format!("no rows in '{sheet}' contribute to the pivot"),
        );
    }

    let mut columns: Vec<ColumnMeta> = row_indices
        .iter()
        .map(|&i| table.columns[i].clone())
        .collect();
    for label in &col_labels {
        columns.push(ColumnMeta::new(label.clone(), ColumnType::Numeric));
    }

    let rows: Vec<Vec<String>> = cells
        .into_iter()
        .map(|(mut row_key, buckets)| {
            for label in &col_labels {
                let rendered = buckets
                    .get(label)
                    .and_then(|values| reduce(aggregator, values))
                    .map(format_number)
                    .unwrap_or_else(|| FILL_VALUE.to_string());
                row_key.push(rendered);
            }
            row_key
        })
        .collect();

    let summary = format!(
        "pivot of {} ({}) by {} x {} in '{}': {} rows, {} value columns",
        value_column,
        aggregator.label(),
        row_keys.join(", "),
        if column_keys.is_empty() {
            "-".to_string()
        } else {
            column_keys.join(", ")
        },
        sheet,
        rows.len(),
        col_labels.len()
    );
    OperationResult::success(ResultValue::Table(Table::new(columns, rows)), summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::test_support::{empty_workbook, sales_workbook};

    fn keys(columns: &[&str]) -> Vec<String> {
        columns.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pivot_region_by_quarter() {
        let book = sales_workbook();
        let result = pivot_table(
            &book,
            "Sales",
            &keys(&["Region"]),
            &keys(&["Quarter"]),
            "Revenue",
            Aggregator::Sum,
        );
        match result {
            OperationResult::Success { value: ResultValue::Table(t), summary } => {
                assert_eq!(t.column_names(), vec!["Region", "Q1", "Q2"]);
                assert_eq!(t.rows[0], vec!["North", "100", "200"]);
                assert_eq!(t.rows[1], vec!["South", "150", "250"]);
                assert!(summary.contains("2 rows, 2 value columns"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_pivot_fills_missing_cells() {
        let book = sales_workbook();
        // Quarter as rows, Notes as columns: the NA note row is skipped,
        // and not every quarter has every note value.
        let result = pivot_table(
            &book,
            "Sales",
            &keys(&["Quarter"]),
            &keys(&["Notes"]),
            "Revenue",
            Aggregator::Sum,
        );
        match result {
            OperationResult::Success { value: ResultValue::Table(t), .. } => {
                assert!(t.rows.iter().flatten().any(|cell| cell == FILL_VALUE));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_pivot_without_column_keys() {
        let book = sales_workbook();
        let result = pivot_table(
            &book,
            "Sales",
            &keys(&["Region"]),
            &[],
            "Revenue",
            Aggregator::Count,
        );
        match result {
            OperationResult::Success { value: ResultValue::Table(t), .. } => {
                assert_eq!(t.column_names(), vec!["Region", "Revenue"]);
                assert_eq!(t.rows[0], vec!["North", "2"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_pivot_empty_sheet_is_empty_result() {
        let book = empty_workbook();
        let result = pivot_table(
            &book,
            "Empty",
            &keys(&["Region"]),
            &[],
            "Revenue",
            Aggregator::Sum,
        );
        assert_eq!(result.failure_kind(), Some(FailureKind::EmptyResult));
    }

    #[test]
    fn test_pivot_requires_row_keys() {
        let book = sales_workbook();
        let result = pivot_table(&book, "Sales", &[], &[], "Revenue", Aggregator::Sum);
        assert_eq!(result.failure_kind(), Some(FailureKind::InvalidArguments));
    }

    #[test]
    fn test_pivot_non_numeric_value_column() {
        let book = sales_workbook();
        let result = pivot_table(
            &book,
            "Sales",
            &keys(&["Region"]),
            &[],
            "Notes",
            Aggregator::Mean,
        );
        assert_eq!(result.failure_kind(), Some(FailureKind::NonNumericAggregate));
    }
}
