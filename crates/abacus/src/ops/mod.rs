//! The operation library: a fixed set of named, parameterized tabular
//! operations, each a pure function of (workbook snapshot, validated
//! arguments) producing an `OperationResult`.

mod aggregate;
pub mod catalog;
mod filter;
mod pivot;
mod request;
mod result;
mod schema_info;

pub use request::{Aggregator, Comparator, OpRequest, Predicate};
pub use result::{FailureKind, OperationResult, ResultValue};

#[cfg(test)]
pub(crate) mod test_support {
    use indexmap::IndexMap;

    use crate::workbook::{ColumnMeta, ColumnType, Table, Workbook};

    /// A small sales workbook shared by operation tests.
    pub fn sales_workbook() -> Workbook {
        let mut sheets = IndexMap::new();
        sheets.insert(
            "Sales".to_string(),
            Table::new(
                vec![
                    ColumnMeta::new("Region", ColumnType::Text),
                    ColumnMeta::new("Quarter", ColumnType::Text),
                    ColumnMeta::new("Revenue", ColumnType::Numeric),
                    ColumnMeta::new("Notes", ColumnType::Text),
                ],
                vec![
                    row(&["North", "Q1", "100", "promo"]),
                    row(&["South", "Q1", "150", "retail"]),
                    row(&["North", "Q2", "200", "NA"]),
                    row(&["South", "Q2", "250", "promo"]),
                ],
            ),
        );
        Workbook::from_tables(sheets)
    }

    /// A workbook with one column-only sheet.
    pub fn empty_workbook() -> Workbook {
        let mut sheets = IndexMap::new();
        sheets.insert(
            "Empty".to_string(),
            Table::new(
                vec![
                    ColumnMeta::new("Region", ColumnType::Text),
                    ColumnMeta::new("Revenue", ColumnType::Numeric),
                ],
                vec![],
            ),
        );
        Workbook::from_tables(sheets)
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }
}
