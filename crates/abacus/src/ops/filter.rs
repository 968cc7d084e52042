//! Row filtering.

use std::cmp::Ordering;

use serde_json::Value;

use crate::workbook::{parse_bool, parse_datetime, parse_number, ColumnType, Table, Workbook};

use super::request::{Comparator, Predicate};
use super::result::{FailureKind, OperationResult, ResultValue};

/// Return the rows of `sheet` matching `predicate` as a new table.
pub fn filter_rows(book: &Workbook, sheet: &str, predicate: &Predicate) -> OperationResult {
    let Some(table) = book.sheet(sheet) else {
        return OperationResult::failure(
            FailureKind::UnknownSheet,
            format!("no sheet named '{sheet}'"),
        );
    };
    let Some(col_idx) = table.column_index(&predicate.column) else {
        return OperationResult::failure(
            FailureKind::UnknownColumn,
            format!("no column '{}' in sheet '{sheet}'", predicate.column),
        );
    };
    let column_type = table.columns[col_idx].inferred_type;

    if !comparator_supported(column_type, predicate.comparator) {
        return OperationResult::failure(
            FailureKind::TypeMismatch,
            format!(
                "comparator '{}' is not valid for {} column '{}'",
                predicate.comparator.symbol(),
                column_type.label(),
                predicate.column
            ),
        );
    }

    let matcher = match CellMatcher::build(column_type, predicate) {
        Ok(m) => m,
        Err(message) => return OperationResult::failure(FailureKind::TypeMismatch, message),
    };

    let total = table.row_count();
    let matched: Vec<Vec<String>> = table
        .rows
        .iter()
        .filter(|row| {
            let cell = row.get(col_idx).map(|s| s.as_str()).unwrap_or("");
            !Table::is_null_value(cell) && matcher.matches(cell)
        })
        .cloned()
        .collect();

    let summary = format!(
        "{} of {} rows in '{}' where {} {} {}",
        matched.len(),
        total,
        sheet,
        predicate.column,
        predicate.comparator.symbol(),
        render_value(&predicate.value),
    );
    OperationResult::success(
        ResultValue::Table(Table::new(table.columns.clone(), matched)),
        summary,
    )
}

/// Which comparators each column type supports.
fn comparator_supported(column_type: ColumnType, comparator: Comparator) -> bool {
    match column_type {
        ColumnType::Numeric | ColumnType::DateTime => comparator != Comparator::Contains,
        ColumnType::Text => matches!(
            comparator,
            Comparator::Eq | Comparator::Ne | Comparator::Contains
        ),
        ColumnType::Boolean => matches!(comparator, Comparator::Eq | Comparator::Ne),
    }
}

/// A typed, pre-parsed predicate ready to test cells against.
enum CellMatcher {
    Numeric(Comparator, f64),
    DateTime(Comparator, chrono::NaiveDateTime),
    TextEquals { negate: bool, needle: String },
    TextContains(String),
    Boolean { negate: bool, expected: bool },
}

impl CellMatcher {
    fn build(column_type: ColumnType, predicate: &Predicate) -> Result<Self, String> {
        let comparator = predicate.comparator;
        match column_type {
            ColumnType::Numeric => {
                let target = value_as_number(&predicate.value).ok_or_else(|| {
                    format!(
                        "value {} is not numeric, required for column '{}'",
                        render_value(&predicate.value),
                        predicate.column
                    )
                })?;
                Ok(CellMatcher::Numeric(comparator, target))
            }
            ColumnType::DateTime => {
                let text = value_as_text(&predicate.value);
                let target = parse_datetime(&text).ok_or_else(|| {
                    format!(
                        "value {} is not a datetime, required for column '{}'",
                        render_value(&predicate.value),
                        predicate.column
                    )
                })?;
                Ok(CellMatcher::DateTime(comparator, target))
            }
            ColumnType::Text => {
                let needle = value_as_text(&predicate.value);
                Ok(match comparator {
                    Comparator::Contains => CellMatcher::TextContains(needle),
                    Comparator::Ne => CellMatcher::TextEquals {
                        negate: true,
                        needle,
                    },
                    _ => CellMatcher::TextEquals {
                        negate: false,
                        needle,
                    },
                })
            }
            ColumnType::Boolean => {
                let expected = value_as_bool(&predicate.value).ok_or_else(|| {
                    format!(
                        "value {} is not a boolean, required for column '{}'",
                        render_value(&predicate.value),
                        predicate.column
                    )
                })?;
                Ok(CellMatcher::Boolean {
                    negate: comparator == Comparator::Ne,
                    expected,
                })
            }
        }
    }

    fn matches(&self, cell: &str) -> bool {
        match self {
            CellMatcher::Numeric(comparator, target) => parse_number(cell)
                .map(|n| ordering_matches(*comparator, n.partial_cmp(target)))
                .unwrap_or(false),
            CellMatcher::DateTime(comparator, target) => parse_datetime(cell)
                .map(|d| ordering_matches(*comparator, d.partial_cmp(target)))
                .unwrap_or(false),
            CellMatcher::TextEquals { negate, needle } => (cell == needle.as_str()) != *negate,
            CellMatcher::TextContains(needle) => cell.contains(needle.as_str()),
            CellMatcher::Boolean { negate, expected } => parse_bool(cell)
                .map(|b| (b == *expected) != *negate)
                .unwrap_or(false),
        }
    }
}

fn ordering_matches(comparator: Comparator, ordering: Option<Ordering>) -> bool {
    let Some(ordering) = ordering else {
        return false;
    };
    match comparator {
        Comparator::Eq => ordering == Ordering::Equal,
        Comparator::Ne => ordering != Ordering::Equal,
        Comparator::Lt => ordering == Ordering::Less,
        Comparator::Le => ordering != Ordering::Greater,
        Comparator::Gt => ordering == Ordering::Greater,
        Comparator::Ge => ordering != Ordering::Less,
        Comparator::Contains => false,
    }
}

fn value_as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn value_as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => parse_bool(s),
        _ => None,
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        other => other.to_string(),
    }
}
