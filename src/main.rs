use clap::Parser;
use tracing_subscriber::EnvFilter;

use storefront_api::cli::Cli;
use storefront_api::config::AppConfig;

const DEFAULT_LOG_FILTER: &str = "storefront_api=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so local runs pick up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!("Starting Storefront API in {:?} mode", config.environment);

    let cli = Cli::parse();

    if let Err(e) = storefront_api::cli::run(cli, config).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
