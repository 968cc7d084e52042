//! Workbook model: sheets, columns, types, and the CSV loader.

mod book;
mod loader;
mod table;
mod types;

pub use book::{Workbook, WorkbookMeta};
pub use loader::{Loader, LoaderConfig};
pub use table::{ColumnMeta, Table};
pub use types::{format_number, parse_bool, parse_datetime, parse_number, ColumnType};
