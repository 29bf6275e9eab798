//! ferry CLI: run and inspect the value-bridge conformance suite.

mod commands;
mod logger;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ferry", version, about = "Cross-language value bridge conformance harness")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the conformance suite against the bundled counterparty
    Run {
        /// Configuration file (default: nearest ferry.toml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Report format (human, json)
        #[arg(long)]
        report: Option<String>,
        /// Run only these cases
        #[arg(long, num_args = 1..)]
        only: Vec<String>,
        /// Skip these cases
        #[arg(long, num_args = 1..)]
        skip: Vec<String>,
    },
    /// List case names in execution order
    List,
    /// Print the wire contract of a value kind (e.g. u64, text, "optional<i32>")
    Describe {
        /// Kind name
        kind: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(2);
        }
    }
}

/// Returns whether every executed case passed.
fn run(cli: Cli) -> anyhow::Result<bool> {
    // Installed before config loading so its diagnostics reach stderr.
    logger::init(logger::level(cli.verbose, None))?;

    match cli.command {
        Commands::Run {
            config,
            report,
            only,
            skip,
        } => {
            let cwd = std::env::current_dir()?;
            let config = commands::run::load_config(&cwd, config.as_deref())?;
            logger::set_level(logger::level(cli.verbose, config.harness.log_level()?));
            commands::run::run(&config, report.as_deref(), &only, &skip)
        }

        Commands::List => {
            commands::list::run();
            Ok(true)
        }

        Commands::Describe { kind } => {
            commands::describe::run(&kind)?;
            Ok(true)
        }
    }
}
