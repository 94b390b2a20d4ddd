use clap::{Parser, Subcommand};

mod commands;

use commands::{BatchArgs, ScanArgs};

#[derive(Parser)]
#[command(name = "market-mood")]
#[command(about = "Put/call ratio market sentiment from recent option-chain activity", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the put/call ratio for a single ticker
    Scan(ScanArgs),
    /// Scan a watchlist of tickers sequentially with rate-limit pauses
    Batch(BatchArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan(args) => {
            commands::run_scan(args).await?;
        }
        Commands::Batch(args) => {
            commands::run_batch(args).await?;
        }
    }

    Ok(())
}
