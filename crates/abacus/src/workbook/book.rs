//! The workbook: an ordered, read-only set of named sheets.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use super::table::{ColumnMeta, Table};

/// Metadata about a loaded workbook snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct WorkbookMeta {
    /// Source path the workbook was loaded from.
    pub source: PathBuf,
    /// SHA-256 fingerprint of the loaded bytes.
    pub fingerprint: String,
    /// When the workbook was loaded.
    pub loaded_at: DateTime<Utc>,
    /// Number of sheets.
    pub sheet_count: usize,
}

/// The full in-memory set of loaded tables for a session.
///
/// A workbook is populated once by the loader (or handed in by the caller)
/// and is read-only afterwards: every question runs against the same
/// immutable snapshot, and reloading produces a fresh `Workbook` rather
/// than mutating this one.
#[derive(Debug, Clone)]
pub struct Workbook {
    sheets: IndexMap<String, Table>,
    meta: WorkbookMeta,
}

impl Workbook {
    /// Create a workbook from already-built tables (ingestion collaborator
    /// path, also the main test entry point).
    pub fn from_tables(sheets: IndexMap<String, Table>) -> Self {
        let sheet_count = sheets.len();
        Self {
            sheets,
            meta: WorkbookMeta {
                source: PathBuf::from("<memory>"),
                fingerprint: String::new(),
                loaded_at: Utc::now(),
                sheet_count,
            },
        }
    }

    /// Create a workbook with explicit metadata (loader path).
    pub fn with_meta(sheets: IndexMap<String, Table>, mut meta: WorkbookMeta) -> Self {
        meta.sheet_count = sheets.len();
        Self { sheets, meta }
    }

    /// Snapshot metadata.
    pub fn meta(&self) -> &WorkbookMeta {
        &self.meta
    }

    /// All sheet names, in load order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(|s| s.as_str()).collect()
    }

    /// Get a sheet by exact name.
    pub fn sheet(&self, name: &str) -> Option<&Table> {
        self.sheets.get(name)
    }

    /// Get the column descriptors for a sheet by exact name.
    pub fn schema(&self, name: &str) -> Option<&[ColumnMeta]> {
        self.sheets.get(name).map(|t| t.columns.as_slice())
    }

    /// Number of sheets.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// True when the workbook holds no sheets.
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// One-paragraph-per-sheet overview for the reasoning prompt: name,
    /// row count, and typed column listing.
    pub fn overview(&self) -> String {
        let mut out = String::new();
        for (name, table) in &self.sheets {
            let cols: Vec<String> = table
                .columns
                .iter()
                .map(|c| format!("{} ({})", c.name, c.inferred_type.label()))
                .collect();
            out.push_str(&format!(
                "- {}: {} rows, columns: {}\n",
                name,
                table.row_count(),
                cols.join(", ")
            ));
        }
        out
    }

    /// Markdown preview of the first `rows` rows of every sheet.
    pub fn preview(&self, rows: usize) -> String {
        let mut sections = Vec::new();
        for (name, table) in &self.sheets {
            let mut section = format!("### Sheet: {name}\n");
            if table.row_count() == 0 {
                section.push_str("(empty sheet)\n");
            } else {
                section.push_str(&table.render_preview(rows));
            }
            sections.push(section);
        }
        sections.join("\n")
    }
}
