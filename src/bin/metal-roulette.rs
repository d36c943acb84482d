mod commands;

use clap::Parser;
use commands::{execute_command, Commands};
use metal_roulette::{RouletteClientImpl, RouletteConfig, RouletteError};

/// Random metal album finder
#[derive(Parser)]
#[command(
    name = "metal-roulette",
    about = "Finds a random metal album on Bandcamp by way of Metal Archives",
    long_about = None
)]
struct Cli {
    /// Show detailed debug information
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = match RouletteConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };
    log::debug!("Using configuration: {config:?}");

    let http_client = http_client::native::NativeClient::new();
    let client = RouletteClientImpl::with_config(Box::new(http_client), &config);

    if let Err(e) = execute_command(args.command, &client, config).await {
        if matches!(e.downcast_ref::<RouletteError>(), Some(RouletteError::Cancelled)) {
            eprintln!("⏹  Search cancelled");
            std::process::exit(130);
        }
        eprintln!("❌ Command failed: {e}");
        std::process::exit(1);
    }

    Ok(())
}
