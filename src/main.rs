use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use trichat::{ClientRouter, Commands, Container, ContainerConfig, Router};

#[derive(Parser)]
#[command(name = "trichat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Answer with the offline mock model instead of a hosted one
    #[arg(long, global = true)]
    mock_model: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Only the server needs model configuration.
    let output = if matches!(cli.command, Commands::Serve { .. }) {
        let config = ContainerConfig::from_env(cli.mock_model)?;
        let container = Container::new(config)?;
        Router::new(&container).route(cli.command).await?
    } else {
        ClientRouter::new().route(cli.command).await?
    };

    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}
