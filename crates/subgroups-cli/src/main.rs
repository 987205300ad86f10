//! Content Subgroups CLI
//!
//! Command-line interface for checking node type schemas, previewing
//! type-change rewrites and listing type picker options

use clap::{Parser, Subcommand};
use subgroups_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "subgroups")]
#[command(about = "Content Subgroups - node type changes with field remapping", long_about = None)]
struct Cli {
    /// Emit logs to stderr (dev | prod)
    #[arg(long, global = true)]
    log_profile: Option<Profile>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate node type and content files
    Validate(commands::validate::ValidateArgs),
    /// Rewrite a command and print the resulting batch
    Plan(commands::plan::PlanArgs),
    /// List type picker options for a content subgroup
    Options(commands::options::OptionsArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Some(profile) = cli.log_profile {
        logging_facility::init(profile);
    }

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Plan(args) => commands::plan::execute(args),
        Commands::Options(args) => commands::options::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
