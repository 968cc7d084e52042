//! Sheet listing and preview command.

use std::path::Path;

use colored::Colorize;

use abacus::{Loader, Result};

/// Preview rows shown per sheet.
const PREVIEW_ROWS: usize = 5;

pub fn run(file: &Path, schema_only: bool) -> Result<()> {
    let book = Loader::new().load(file)?;

    println!(
        "{} {} ({})",
        "Workbook".green().bold(),
        file.display(),
        book.meta().fingerprint
    );
    print!("{}", book.overview());

    if schema_only {
        for name in book.sheet_names() {
            println!("\n{}", format!("Sheet: {name}").cyan().bold());
            for column in book.schema(name).unwrap_or_default() {
                println!("  {} ({})", column.name, column.inferred_type.label());
            }
        }
    } else {
        println!("\n{}", book.preview(PREVIEW_ROWS));
    }

    Ok(())
}
