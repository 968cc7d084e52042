//! CSV/TSV loader: turns one file or a directory of files into a workbook.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::Utc;
use indexmap::IndexMap;
use sha2::{Digest, Sha256};

use crate::error::{AbacusError, Result};

use super::book::{Workbook, WorkbookMeta};
use super::table::{ColumnMeta, Table};
use super::types::{self, ColumnType};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Extensions recognized when loading a directory.
const TABULAR_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Delimiter to use (None = auto-detect per file).
    pub delimiter: Option<u8>,
    /// Whether files have a header row.
    pub has_header: bool,
    /// Maximum rows to read per sheet (None = all).
    pub max_rows: Option<usize>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
        }
    }
}

/// Loads tabular files into an immutable workbook snapshot.
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    /// Create a loader with default configuration.
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
        }
    }

    /// Create a loader with custom configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Load a workbook from a file or a directory.
    ///
    /// A single file becomes a one-sheet workbook named after the file
    /// stem; a directory becomes one sheet per tabular file, in
    /// lexicographic order.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Workbook> {
        let path = path.as_ref();
        let mut hasher = Sha256::new();
        let mut sheets = IndexMap::new();

        if path.is_dir() {
            let mut files: Vec<PathBuf> = std::fs::read_dir(path)
                .map_err(|e| io_error(path, e))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| is_tabular_file(p))
                .collect();
            files.sort();

            if files.is_empty() {
                return Err(AbacusError::EmptyData(format!(
                    "no tabular files found in '{}'",
                    path.display()
                )));
            }
            for file in files {
                let (name, table) = self.load_sheet(&file, &mut hasher)?;
                sheets.insert(name, table);
            }
        } else {
            let (name, table) = self.load_sheet(path, &mut hasher)?;
            sheets.insert(name, table);
        }

        let meta = WorkbookMeta {
            source: path.to_path_buf(),
            fingerprint: format!("sha256:{:x}", hasher.finalize()),
            loaded_at: Utc::now(),
            sheet_count: sheets.len(),
        };
        Ok(Workbook::with_meta(sheets, meta))
    }

    fn load_sheet(&self, path: &Path, hasher: &mut Sha256) -> Result<(String, Table)> {
        let mut file = File::open(path).map_err(|e| io_error(path, e))?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| io_error(path, e))?;
        hasher.update(&contents);

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents),
        };
        let table = self.parse_bytes(&contents, delimiter)?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sheet".to_string());
        Ok((name, table))
    }

    /// Parse raw bytes into a table, inferring column types.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = if self.config.has_header {
            reader.headers()?.iter().map(|s| s.trim().to_string()).collect()
        } else {
            Vec::new()
        };

        let mut rows: Vec<Vec<String>> = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if idx >= max {
                    break;
                }
            }
            let record = record?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        let headers = if headers.is_empty() {
            let width = rows.first().map(|r| r.len()).unwrap_or(0);
            (0..width).map(|i| format!("column_{}", i + 1)).collect()
        } else {
            headers
        };
        if headers.is_empty() {
            return Err(AbacusError::EmptyData("no columns found".to_string()));
        }

        // Normalize ragged rows to the header width.
        let width = headers.len();
        for row in &mut rows {
            row.resize(width, String::new());
        }

        let columns = infer_columns(&headers, &rows);
        Ok(Table::new(columns, rows))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

fn io_error(path: &Path, source: std::io::Error) -> AbacusError {
    AbacusError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn is_tabular_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| TABULAR_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
}

/// Detect the delimiter by counting candidate occurrences over the first
/// few lines; the candidate with the highest consistent per-line count
/// wins, with a bonus for tab (rare inside actual data).
fn detect_delimiter(bytes: &[u8]) -> u8 {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(10)
        .collect();

    let mut best = b',';
    let mut best_score = 0usize;
    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|l| l.bytes().filter(|&b| b == delim).count())
            .collect();
        let Some(&first) = counts.first() else { continue };
        if first == 0 {
            continue;
        }
        let consistent = counts.iter().all(|&c| c == first);
        let score = if consistent { first * 100 } else { first }
            + if delim == b'\t' { 10 } else { 0 };
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }
    best
}

/// Infer a column type from the non-null values of each column.
fn infer_columns(headers: &[String], rows: &[Vec<String>]) -> Vec<ColumnMeta> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let values = rows
                .iter()
                .map(|r| r.get(idx).map(|s| s.as_str()).unwrap_or(""))
                .filter(|v| !Table::is_null_value(v));
            ColumnMeta::new(name.clone(), infer_type(values))
        })
        .collect()
}

fn infer_type<'a>(values: impl Iterator<Item = &'a str>) -> ColumnType {
    let mut seen_any = false;
    let mut all_numeric = true;
    let mut all_bool = true;
    let mut all_date = true;

    for value in values {
        seen_any = true;
        all_numeric = all_numeric && types::parse_number(value).is_some();
        all_bool = all_bool && types::parse_bool(value).is_some();
        all_date = all_date && types::looks_like_date(value);
        if !all_numeric && !all_bool && !all_date {
            return ColumnType::Text;
        }
    }

    if !seen_any {
        ColumnType::Text
    } else if all_bool {
        ColumnType::Boolean
    } else if all_numeric {
        ColumnType::Numeric
    } else if all_date {
        ColumnType::DateTime
    } else {
        ColumnType::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter(b"a,b,c\n1,2,3\n"), b',');
        assert_eq!(detect_delimiter(b"a\tb\tc\n1\t2\t3\n"), b'\t');
        assert_eq!(detect_delimiter(b"a;b;c\n1;2;3\n"), b';');
    }

    #[test]
    fn test_parse_and_infer_types() {
        let loader = Loader::new();
        let data = b"name,age,active,joined\nAlice,30,true,2024-01-15\nBob,25,false,2024-02-20\n";
        let table = loader.parse_bytes(data, b',').unwrap();

        assert_eq!(table.column_names(), vec!["name", "age", "active", "joined"]);
        assert_eq!(table.column("name").unwrap().inferred_type, ColumnType::Text);
        assert_eq!(table.column("age").unwrap().inferred_type, ColumnType::Numeric);
        assert_eq!(table.column("active").unwrap().inferred_type, ColumnType::Boolean);
        assert_eq!(table.column("joined").unwrap().inferred_type, ColumnType::DateTime);
    }

    #[test]
    fn test_nulls_excluded_from_inference() {
        let loader = Loader::new();
        let data = b"value\n1\nNA\n3\n";
        let table = loader.parse_bytes(data, b',').unwrap();
        assert_eq!(table.column("value").unwrap().inferred_type, ColumnType::Numeric);
    }

    #[test]
    fn test_ragged_rows_padded() {
        let loader = Loader::new();
        let data = b"a,b,c\n1,2\n4,5,6,7\n";
        let table = loader.parse_bytes(data, b',').unwrap();
        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.rows[1].len(), 3);
    }

    #[test]
    fn test_load_file_named_by_stem() {
        use std::io::Write;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        let mut f = File::create(&path).unwrap();
        f.write_all(b"Region,Revenue\nNorth,100\nSouth,250\n").unwrap();

        let book = Loader::new().load(&path).unwrap();
        assert_eq!(book.sheet_names(), vec!["sales"]);
        assert!(book.meta().fingerprint.starts_with("sha256:"));
    }

    #[test]
    fn test_load_directory_in_order() {
        use std::io::Write;
        let dir = tempfile::tempdir().unwrap();
        for name in ["b_staff.csv", "a_sales.csv"] {
            let mut f = File::create(dir.path().join(name)).unwrap();
            f.write_all(b"x\n1\n").unwrap();
        }

        let book = Loader::new().load(dir.path()).unwrap();
        assert_eq!(book.sheet_names(), vec!["a_sales", "b_staff"]);
    }

    #[test]
    fn test_empty_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Loader::new().load(dir.path()).is_err());
    }
}
