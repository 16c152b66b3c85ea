//! ShareFlow trace CLI
//!
//! Replays recorded interaction scenarios through the capture pipeline and
//! prints the resulting trace records as JSON lines.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use shareflow_trace::scenario::{self, Scenario};
use shareflow_trace::trace::JsonLinesTransport;

#[derive(Parser)]
#[command(name = "shareflow-trace")]
#[command(about = "Browser interaction trace capture")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario file and print its trace records to stdout
    Replay {
        /// Scenario JSON file
        scenario: PathBuf,

        /// Emit a navigate record before the first event
        #[arg(long)]
        navigate: bool,
    },
}

fn main() -> anyhow::Result<()> {
    shareflow_trace::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            scenario: path,
            navigate,
        } => {
            let scenario = Scenario::from_path(&path)
                .with_context(|| format!("Failed to load scenario {}", path.display()))?;
            let transport = Arc::new(JsonLinesTransport::new(std::io::stdout()));
            let dispatched = scenario::replay(&scenario, transport, navigate)
                .with_context(|| format!("Failed to replay {}", path.display()))?;
            tracing::info!("Replayed {} events from {}", dispatched, path.display());
        }
    }

    Ok(())
}
