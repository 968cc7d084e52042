//! Grouped and whole-table aggregation.

use indexmap::IndexMap;

use crate::workbook::{format_number, parse_number, ColumnMeta, ColumnType, Table, Workbook};

use super::request::Aggregator;
use super::result::{FailureKind, OperationResult, ResultValue};

/// Aggregate `metric` over `sheet`, optionally grouped by `group_by`
/// columns. An empty `group_by` produces a single scalar.
pub fn aggregate(
    book: &Workbook,
    sheet: &str,
    group_by: &[String],
    metric: &str,
    aggregator: Aggregator,
) -> OperationResult {
    let (table, key_indices, metric_idx) = match lookup(book, sheet, group_by, metric, aggregator)
    {
        Ok(located) => located,
        Err(failure) => return failure,
    };

    if group_by.is_empty() {
        let values = metric_values(table, metric_idx, aggregator);
        return match reduce(aggregator, &values) {
            Some(value) => OperationResult::success(
                ResultValue::Scalar { value },
                format!("{} of {} in '{}'", aggregator.label(), metric, sheet),
            ),
            None => OperationResult::failure(
                FailureKind::EmptyResult,
                format!("no non-null values of '{metric}' to {}", aggregator.label()),
            ),
        };
    }

    // Group rows by key tuple in first-seen order; rows with a null in
    // any key column are skipped.
    let mut groups: IndexMap<Vec<String>, Vec<f64>> = IndexMap::new();
    for row in &table.rows {
        let key: Vec<String> = key_indices
            .iter()
            .map(|&i| row.get(i).cloned().unwrap_or_default())
            .collect();
        if key.iter().any(|k| Table::is_null_value(k)) {
            continue;
        }
        let cell = row.get(metric_idx).map(|s| s.as_str()).unwrap_or("");
        let entry = groups.entry(key).or_default();
        if !Table::is_null_value(cell) {
            match aggregator {
                Aggregator::Count => entry.push(1.0),
                _ => {
                    if let Some(n) = parse_number(cell) {
                        entry.push(n);
                    }
                }
            }
        }
    }

    let mut columns: Vec<ColumnMeta> = key_indices
        .iter()
        .map(|&i| table.columns[i].clone())
        .collect();
    columns.push(ColumnMeta::new(metric, ColumnType::Numeric));

    let rows: Vec<Vec<String>> = groups
        .into_iter()
        .map(|(mut key, values)| {
            let value = reduce(aggregator, &values).unwrap_or(0.0);
            key.push(format_number(value));
            key
        })
        .collect();

    let summary = format!(
        "{} of {} by {} in '{}': {} groups",
        aggregator.label(),
        metric,
        group_by.join(", "),
        sheet,
        rows.len()
    );
    OperationResult::success(ResultValue::Table(Table::new(columns, rows)), summary)
}

/// Shared argument validation for aggregate and pivot: locates the sheet,
/// the key columns, and the metric column, and enforces the numeric rule.
pub(super) fn lookup<'a>(
    book: &'a Workbook,
    sheet: &str,
    key_columns: &[String],
    metric: &str,
    aggregator: Aggregator,
) -> Result<(&'a Table, Vec<usize>, usize), OperationResult> {
    let Some(table) = book.sheet(sheet) else {
        return Err(OperationResult::failure(
            FailureKind::UnknownSheet,
            format!("no sheet named '{sheet}'"),
        ));
    };

    let mut key_indices = Vec::with_capacity(key_columns.len());
    for column in key_columns {
        match table.column_index(column) {
            Some(idx) => key_indices.push(idx),
            None => {
                return Err(OperationResult::failure(
                    FailureKind::UnknownColumn,
                    format!("no column '{column}' in sheet '{sheet}'"),
                ))
            }
        }
    }

    let Some(metric_idx) = table.column_index(metric) else {
        return Err(OperationResult::failure(
            FailureKind::UnknownColumn,
            format!("no column '{metric}' in sheet '{sheet}'"),
        ));
    };

    let metric_type = table.columns[metric_idx].inferred_type;
    if aggregator.requires_numeric() && !metric_type.is_numeric() {
        return Err(OperationResult::failure(
            FailureKind::NonNumericAggregate,
            format!(
                "cannot {} over {} column '{metric}'",
                aggregator.label(),
                metric_type.label()
            ),
        ));
    }
    Ok((table, key_indices, metric_idx))
}

/// Non-null metric values for the ungrouped path. For `count` every
/// non-null cell contributes; otherwise only parseable numbers do.
fn metric_values(table: &Table, metric_idx: usize, aggregator: Aggregator) -> Vec<f64> {
    table
        .column_values(metric_idx)
        .filter(|cell| !Table::is_null_value(cell))
        .filter_map(|cell| match aggregator {
            Aggregator::Count => Some(1.0),
            _ => parse_number(cell),
        })
        .collect()
}

/// Reduce a group's collected values. Returns None when an aggregator
/// other than sum/count has nothing to reduce.
pub(super) fn reduce(aggregator: Aggregator, values: &[f64]) -> Option<f64> {
    match aggregator {
        Aggregator::Count => Some(values.len() as f64),
        Aggregator::Sum => Some(values.iter().sum()),
        Aggregator::Mean => {
            if values.is_empty() {
                None
            } else {
                Some(values.iter().sum::<f64>() / values.len() as f64)
            }
        }
        Aggregator::Min => values.iter().cloned().reduce(f64::min),
        Aggregator::Max => values.iter().cloned().reduce(f64::max),
    }
}
