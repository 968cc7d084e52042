//! Schema lookup operations: sheet listing, column descriptors, and
//! ranked fuzzy column search.

use crate::resolve::NameResolver;
use crate::workbook::{ColumnMeta, ColumnType, Table, Workbook};

use super::result::{FailureKind, OperationResult, ResultValue};

/// List every sheet with its row and column counts. Never fails.
pub fn list_sheets(book: &Workbook) -> OperationResult {
    let columns = vec![
        ColumnMeta::new("sheet", ColumnType::Text),
        ColumnMeta::new("rows", ColumnType::Numeric),
        ColumnMeta::new("columns", ColumnType::Numeric),
    ];
    let rows: Vec<Vec<String>> = book
        .sheet_names()
        .iter()
        .filter_map(|name| {
            book.sheet(name).map(|table| {
                vec![
                    (*name).to_string(),
                    table.row_count().to_string(),
                    table.column_count().to_string(),
                ]
            })
        })
        .collect();

    let summary = if rows.is_empty() {
        "the workbook has no sheets".to_string()
    } else {
        format!(
            "{} sheet(s): {}",
            rows.len(),
            book.sheet_names().join(", ")
        )
    };
    OperationResult::success(ResultValue::Table(Table::new(columns, rows)), summary)
}

/// Column descriptors for one sheet.
pub fn get_schema(book: &Workbook, sheet: &str) -> OperationResult {
    let Some(schema) = book.schema(sheet) else {
        return OperationResult::failure(
            FailureKind::UnknownSheet,
            format!("no sheet named '{sheet}'"),
        );
    };
    let columns = vec![
        ColumnMeta::new("column", ColumnType::Text),
        ColumnMeta::new("type", ColumnType::Text),
    ];
    let rows: Vec<Vec<String>> = schema
        .iter()
        .map(|c| vec![c.name.clone(), c.inferred_type.label().to_string()])
        .collect();

    let summary = format!("'{sheet}' has {} column(s)", rows.len());
    OperationResult::success(ResultValue::Table(Table::new(columns, rows)), summary)
}

/// Rank actual column names against a caller-supplied candidate.
///
/// Scoped to one sheet when `sheet` is given, otherwise across the whole
/// workbook. Never fails: an unknown scope or a candidate nothing comes
/// close to yields an empty listing.
pub fn find_column(
    book: &Workbook,
    resolver: &NameResolver,
    candidate: &str,
    sheet: Option<&str>,
) -> OperationResult {
    let columns = vec![
        ColumnMeta::new("sheet", ColumnType::Text),
        ColumnMeta::new("column", ColumnType::Text),
        ColumnMeta::new("score", ColumnType::Numeric),
    ];

    let mut rows: Vec<Vec<String>> = Vec::new();
    let scopes: Vec<&str> = match sheet {
        Some(s) => book.sheet(s).map(|_| vec![s]).unwrap_or_default(),
        None => book.sheet_names(),
    };
    for scope in scopes {
        let names = book
            .schema(scope)
            .map(|cols| cols.iter().map(|c| c.name.as_str()).collect::<Vec<_>>())
            .unwrap_or_default();
        for ranked in resolver.rank(candidate, &names) {
            rows.push(vec![
                scope.to_string(),
                ranked.name,
                format!("{:.0}", ranked.score),
            ]);
        }
    }
    // Cross-sheet listings interleave per sheet; re-rank globally.
    rows.sort_by(|a, b| {
        let score = |r: &Vec<String>| r[2].parse::<f64>().unwrap_or(0.0);
        score(b).partial_cmp(&score(a)).unwrap_or(std::cmp::Ordering::Equal)
    });

    let summary = if rows.is_empty() {
        format!("no columns score close to '{candidate}'")
    } else {
        format!("{} candidate(s) for '{candidate}'", rows.len())
    };
    OperationResult::success(ResultValue::Table(Table::new(columns, rows)), summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::test_support::sales_workbook;

    #[test]
    fn test_list_sheets() {
        let book = sales_workbook();
        match list_sheets(&book) {
            OperationResult::Success { value: ResultValue::Table(t), summary } => {
                assert_eq!(t.rows[0][0], "Sales");
                assert!(summary.contains("Sales"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_get_schema() {
        let book = sales_workbook();
        match get_schema(&book, "Sales") {
            OperationResult::Success { value: ResultValue::Table(t), .. } => {
                assert_eq!(t.rows[0], vec!["Region", "text"]);
                assert_eq!(t.rows[2], vec!["Revenue", "numeric"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_get_schema_unknown_sheet() {
        let book = sales_workbook();
        let result = get_schema(&book, "Inventory");
        assert_eq!(result.failure_kind(), Some(FailureKind::UnknownSheet));
    }

    #[test]
    fn test_find_column_scoped() {
        let book = sales_workbook();
        let resolver = NameResolver::new();
        match find_column(&book, &resolver, "Revenu", Some("Sales")) {
            OperationResult::Success { value: ResultValue::Table(t), .. } => {
                assert!(!t.rows.is_empty());
                assert_eq!(t.rows[0][1], "Revenue");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_find_column_never_fails() {
        let book = sales_workbook();
        let resolver = NameResolver::new();
        let result = find_column(&book, &resolver, "zzzzzz", None);
        match result {
            OperationResult::Success { value: ResultValue::Table(t), summary } => {
                assert!(t.rows.is_empty());
                assert!(summary.contains("no columns"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        // Unknown scope is also not a failure for this operation.
        let result = find_column(&book, &resolver, "Revenue", Some("Nope"));
        assert!(!result.is_failure());
    }
}
