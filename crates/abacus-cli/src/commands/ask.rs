//! One-shot question command.

use std::path::Path;

use colored::Colorize;

use abacus::{Completion, Result};

use crate::cli::ProviderChoice;

pub fn run(
    file: &Path,
    question: &str,
    provider: ProviderChoice,
    show_transcript: bool,
    max_steps: Option<usize>,
) -> Result<()> {
    let abacus = super::build_abacus(file, provider, max_steps)?;

    println!(
        "{} {} ({} sheets)",
        "Loaded".green().bold(),
        file.display(),
        abacus.workbook().sheet_count()
    );

    let answer = abacus.ask(question)?;

    match answer.completion {
        Completion::Answered => println!("\n{}", "Answer".green().bold()),
        Completion::StepLimitExceeded => println!("\n{}", "Partial answer".yellow().bold()),
        Completion::Aborted => println!("\n{}", "Aborted".red().bold()),
    }
    println!("{}", answer.text);

    if show_transcript {
        println!(
            "\n{} ({} steps)",
            "Transcript".cyan().bold(),
            answer.steps
        );
        println!("{}", serde_json::to_string_pretty(&answer.transcript)?);
    }

    Ok(())
}
