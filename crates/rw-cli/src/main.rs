use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};

mod cmd_generate;
mod cmd_run;

#[derive(Parser)]
#[command(name = "roadwatch", about = "Synthetic road-incident feed")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the live feed until SIGINT/SIGTERM
    Run {
        /// Path to roadwatch.toml config file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Generate one batch of incidents and print it as JSON Lines
    Generate {
        /// Number of incidents
        #[arg(short = 'n', long, default_value_t = 10, allow_negative_numbers = true)]
        count: i64,

        /// Seed for a reproducible batch
        #[arg(long)]
        seed: Option<u64>,

        /// Instant the batch is stamped at (RFC 3339); defaults to now
        #[arg(long, value_parser = parse_instant)]
        at: Option<DateTime<FixedOffset>>,

        /// Region catalog TOML file; the built-in catalog otherwise
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

fn parse_instant(s: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(s).map_err(|e| format!("expected RFC 3339 instant: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => cmd_run::run(config).await?,
        Commands::Generate {
            count,
            seed,
            at,
            catalog,
        } => cmd_generate::run(count, seed, at, catalog)?,
    }

    Ok(())
}
