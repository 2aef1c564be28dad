mod categorizer;
mod cli;
mod error;
mod finance;
mod fmt;
mod importer;
mod models;
mod optimizer;
mod reports;
mod scraper;
mod settings;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ConfigCommands};

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Extract { file, json } => cli::extract::run(&file, json),
        Commands::Analyze { deal, json } => cli::analyze::run(&deal, json),
        Commands::Suggest {
            deal,
            limit,
            per_candidate_fees,
            json,
        } => cli::suggest::run(&deal, limit, per_candidate_fees, json),
        Commands::Export { file, output } => cli::export::run(&file, &output),
        Commands::Demo => cli::demo::run(),
        Commands::Config { command } => match command {
            ConfigCommands::Show => cli::config::show(),
            ConfigCommands::Set { key, value } => cli::config::set(&key, &value),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
