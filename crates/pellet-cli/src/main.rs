use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod run;
mod sink;

#[derive(Debug, Parser)]
#[command(name = "pellet-cli")]
#[command(about = "Pellet price tracker command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch all configured source pages once and persist the snapshots.
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Run) | None => run::execute().await,
    }
}
