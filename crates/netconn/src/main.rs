mod commands;
mod nats;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "netconn")]
#[command(about = "Provision AWS subnets from network events on NATS", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to NATS and handle network events until interrupted
    Run {
        /// NATS server URL
        #[arg(long)]
        nats_uri: Option<String>,
        /// Subject to subscribe to (repeatable, replaces the configured list)
        #[arg(short, long = "subject")]
        subjects: Vec<String>,
        /// Delay between network interface polls before a subnet delete
        #[arg(long)]
        poll_interval_ms: Option<u64>,
        /// Give up a delete after this many interface polls
        #[arg(long)]
        max_poll_attempts: Option<u32>,
    },
    /// Decode and validate an event payload offline
    Check {
        /// JSON payload file
        file: PathBuf,
        /// Subject the payload would arrive on
        #[arg(short, long, default_value = "network.create.aws")]
        subject: String,
    },
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Run {
            nats_uri,
            subjects,
            poll_interval_ms,
            max_poll_attempts,
        } => {
            let overrides = commands::run::Overrides {
                nats_uri,
                subjects,
                poll_interval_ms,
                max_poll_attempts,
            };
            commands::run::handle(overrides).await?;
        }
        Commands::Check { file, subject } => {
            if !commands::check::handle(&file, &subject)? {
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("netconn {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
