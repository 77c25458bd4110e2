//! Starforge - Development Tools

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "starforge-tools")]
#[command(about = "Development tools for the Starforge construction model")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate data files
    Validate {
        /// Path to data directory
        #[arg(default_value = "assets")]
        path: PathBuf,
    },
    /// Run a scenario headless and print what was built
    Simulate {
        /// Scenario file
        #[arg(short, long, default_value = "assets/scenarios/frontier.ron")]
        scenario: PathBuf,
        /// Number of turns to process
        #[arg(short, long, default_value_t = 20)]
        turns: u64,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { path } => {
            tracing::info!("Validating data files in: {}", path.display());
            match starforge_tools::validate::validate_data_directory(&path) {
                Ok(count) => tracing::info!(files = count, "Validation passed"),
                Err(e) => {
                    tracing::error!("Validation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Simulate {
            scenario,
            turns,
            json,
        } => {
            let report = match starforge_tools::simulate::run_scenario(&scenario, turns) {
                Ok(report) => report,
                Err(e) => {
                    tracing::error!("Simulation failed: {e}");
                    std::process::exit(1);
                }
            };
            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(out) => println!("{out}"),
                    Err(e) => {
                        tracing::error!("Failed to encode report: {e}");
                        std::process::exit(1);
                    }
                }
            } else {
                print!("{}", starforge_tools::simulate::render_text(&report));
            }
        }
    }
}
