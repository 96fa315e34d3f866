//! distmatrix - travel distances and times between addresses
//!
//! Reads settings, calls the Google Distance Matrix API (through the response
//! cache) and prints the result as a table.

use clap::Parser;
use tracing::Level;

use distmatrix::cli::{CalculateArgs, Cli, Command};
use distmatrix::config::{ClientConfig, Settings};
use distmatrix::data::DistanceMatrixClient;
use distmatrix::render::{render_summary, render_table};

async fn run_calculate(settings: &Settings, args: CalculateArgs) -> anyhow::Result<()> {
    let (origins, destinations) = args.addresses()?;

    let mut config = settings.client_config()?;
    if args.no_cache {
        config.enable_cache = false;
    }

    let mut client = DistanceMatrixClient::new(config)?;
    settings.apply_defaults(&mut client)?;

    let response = client
        .calculate(origins, destinations, &args.request_options())
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response.raw()?)?);
    } else {
        println!("{}", render_table(&response));
        println!("{}", render_summary(&response));
    }
    Ok(())
}

fn run_clear_cache(settings: &Settings, key: Option<&str>) -> anyhow::Result<()> {
    // Clearing works on the namespace, so a missing API key is fine here
    let config = ClientConfig {
        api_key: settings.api_key.clone(),
        enable_cache: true,
        cache_ttl_seconds: settings.cache_ttl_seconds,
    };
    let client = DistanceMatrixClient::new(config)?;

    if client.clear_cache(key) {
        println!("Cache cleared");
    } else if key.is_some() {
        println!("No cache entry found");
    } else {
        anyhow::bail!("Failed to clear the cache");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .init();

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Calculate(args) => run_calculate(&settings, args).await,
        Command::ClearCache { key } => run_clear_cache(&settings, key.as_deref()),
    }
}
