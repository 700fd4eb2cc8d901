//! shelfmap entry point.
//!
//! Runs the fixed library report once. Logging goes to stderr so stdout only
//! carries the report itself.

use anyhow::Result;
use shelfmap_client::{CachedFetcher, FetchConfig, HttpTransport};
use shelfmap_core::{AppConfig, JsonFileStorage};
use tracing_subscriber::EnvFilter;

mod driver;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load()?;
    tracing::debug!("using cache file {}", config.cache_path.display());

    let transport = HttpTransport::new(FetchConfig::from(&config))?;
    let storage = JsonFileStorage::new(&config.cache_path);
    let fetcher = CachedFetcher::open(transport, storage, config.pacing()).await;

    let mut stdout = std::io::stdout();
    driver::run(&fetcher, &config, &mut stdout).await
}
