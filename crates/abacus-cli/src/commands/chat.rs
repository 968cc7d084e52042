//! Interactive question loop.

use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use abacus::Result;

use crate::cli::ProviderChoice;

pub fn run(file: &Path, provider: ProviderChoice, max_steps: Option<usize>) -> Result<()> {
    let abacus = super::build_abacus(file, provider, max_steps)?;

    println!(
        "{} {} ({} sheets). Type 'exit' or 'quit' to stop.",
        "Loaded".green().bold(),
        file.display(),
        abacus.workbook().sheet_count()
    );

    let stdin = io::stdin();
    loop {
        print!("{} ", "question>".cyan().bold());
        io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break; // EOF
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        // Each question gets its own session over the shared snapshot.
        match abacus.ask(question) {
            Ok(answer) => println!("\n{}\n", answer.text),
            Err(e) => eprintln!("{} {e}\n", "error:".red().bold()),
        }
    }

    println!("Goodbye.");
    Ok(())
}
