//! Abacus CLI - ask natural-language questions about tabular data.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    commands::init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Ask {
            file,
            question,
            provider,
            transcript,
            max_steps,
        } => commands::ask::run(&file, &question, provider, transcript, max_steps),

        Commands::Sheets { file, schema } => commands::sheets::run(&file, schema),

        Commands::Chat {
            file,
            provider,
            max_steps,
        } => commands::chat::run(&file, provider, max_steps),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
