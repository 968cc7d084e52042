//! Tabular data representation: one sheet of a workbook.

use serde::{Deserialize, Serialize};

use super::types::ColumnType;

/// Descriptor for a single column: name plus inferred type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Column name, unique within the table.
    pub name: String,
    /// Inferred data type.
    pub inferred_type: ColumnType,
}

impl ColumnMeta {
    /// Create a new column descriptor.
    pub fn new(name: impl Into<String>, inferred_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            inferred_type,
        }
    }
}

/// One rectangular dataset: ordered column descriptors plus row-major
/// string cell storage. Cell values are interpreted through the column's
/// inferred type at operation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Ordered column descriptors.
    pub columns: Vec<ColumnMeta>,
    /// Row data (row-major order).
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a new table.
    pub fn new(columns: Vec<ColumnMeta>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get all column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get the index of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get a column descriptor by exact name.
    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Check if a value represents a missing/null value.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("nil")
            || trimmed == "."
            || trimmed == "-"
    }

    /// Render the first `max_rows` rows as a markdown table.
    ///
    /// Used for terminal previews and for showing intermediate results to
    /// the reasoning capability without flooding the prompt.
    pub fn render_preview(&self, max_rows: usize) -> String {
        if self.columns.is_empty() {
            return "(empty table)".to_string();
        }

        let mut out = String::new();
        let names: Vec<&str> = self.column_names();
        out.push_str(&format!("| {} |\n", names.join(" | ")));
        out.push_str(&format!(
            "|{}\n",
            names.iter().map(|_| " --- |").collect::<String>()
        ));

        for row in self.rows.iter().take(max_rows) {
            let cells: Vec<&str> = (0..self.columns.len())
                .map(|i| row.get(i).map(|s| s.as_str()).unwrap_or(""))
                .collect();
            out.push_str(&format!("| {} |\n", cells.join(" | ")));
        }

        if self.rows.len() > max_rows {
            out.push_str(&format!("({} more rows)\n", self.rows.len() - max_rows));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table::new(
            vec![
                ColumnMeta::new("name", ColumnType::Text),
                ColumnMeta::new("age", ColumnType::Numeric),
            ],
            vec![
                vec!["Alice".to_string(), "30".to_string()],
                vec!["Bob".to_string(), "25".to_string()],
            ],
        )
    }

    #[test]
    fn test_column_lookup() {
        let table = sample_table();
        assert_eq!(table.column_index("age"), Some(1));
        assert_eq!(table.column_index("Age"), None);
        assert_eq!(table.column("age").unwrap().inferred_type, ColumnType::Numeric);
    }

    #[test]
    fn test_column_values() {
        let table = sample_table();
        let ages: Vec<&str> = table.column_values(1).collect();
        assert_eq!(ages, vec!["30", "25"]);
    }

    #[test]
    fn test_is_null_value() {
        assert!(Table::is_null_value(""));
        assert!(Table::is_null_value("NA"));
        assert!(Table::is_null_value("n/a"));
        assert!(Table::is_null_value("NULL"));
        assert!(Table::is_null_value("."));
        assert!(!Table::is_null_value("value"));
        assert!(!Table::is_null_value("0"));
    }

    #[test]
    fn test_render_preview_truncates() {
        let mut table = sample_table();
        for i in 0..20 {
            table.rows.push(vec![format!("p{i}"), i.to_string()]);
        }
        let preview = table.render_preview(5);
        assert!(preview.contains("| name | age |"));
        assert!(preview.contains("17 more rows"));
    }
}
