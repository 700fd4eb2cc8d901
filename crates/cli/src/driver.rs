//! The report the binary prints: library count, one library, nearby restaurants.

use anyhow::{Context, Result};
use shelfmap_client::fetch::Transport;
use shelfmap_client::{CachedFetcher, build_library_index, fetch_library, nearby_restaurants};
use shelfmap_core::{AppConfig, CacheStorage};
use std::io::Write;

pub async fn run<T, S, W>(fetcher: &CachedFetcher<T, S>, config: &AppConfig, out: &mut W) -> Result<()>
where
    T: Transport,
    S: CacheStorage,
    W: Write,
{
    let index = build_library_index(fetcher, &config.library_index_url, &config.library_site_url)
        .await
        .context("failed to build library index")?;
    writeln!(out, "{} libraries listed at {}", index.len(), config.library_index_url)?;

    let library = fetch_library(fetcher, &config.library_url)
        .await
        .context("failed to load library page")?;
    writeln!(out, "{}", library.info())?;

    let api_key = match config.require_yelp_api_key() {
        Ok(key) => key,
        Err(e) => {
            tracing::warn!("skipping restaurant search: {}", e);
            return Ok(());
        }
    };

    let results = nearby_restaurants(fetcher, &config.yelp_search_url, api_key, &library)
        .await
        .context("restaurant search failed")?;

    if results.restaurants.is_empty() {
        writeln!(out, "No restaurants found near {}", library.name)?;
    } else {
        writeln!(out, "Restaurants near {}:", library.name)?;
        for restaurant in &results.restaurants {
            writeln!(out, "  {}", restaurant.summary())?;
        }
    }

    Ok(())
}
