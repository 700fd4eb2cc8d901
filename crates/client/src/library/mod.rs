//! University library directory scraping.
//!
//! ### Pages
//! - Index: `li.css-77qsxv` entries, each holding a `span` name and an `a` link.
//! - Detail: `h1.css-1xx2irx-StyledHeading` name, `address` location, and a
//!   contact link inside `div.css-10ynnyg`.
//!
//! Both pages are fetched through the cache, so a second run parses the stored
//! HTML without touching the network.

pub mod index;
pub mod page;

pub use index::parse_library_index;
pub use page::parse_library_page;

use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};
use shelfmap_core::{CacheStorage, Error};
use std::collections::BTreeMap;

use crate::fetch::{CachedFetcher, Transport};

/// Opening hours shown for every location; the detail pages render theirs client-side.
pub const DEFAULT_HOURS: &str = "Today: 10am - 5pm, by appointment";

const UNKNOWN: &str = "unknown";

/// One library location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub name: String,
    pub location: Option<String>,
    pub hours: String,
    pub phone: Option<String>,
}

impl Library {
    /// One-line summary for display.
    pub fn info(&self) -> String {
        format!(
            "{} locates at {}. Hours of {}. For more information, please contact {}",
            self.name,
            self.location.as_deref().unwrap_or(UNKNOWN),
            self.hours,
            self.phone.as_deref().unwrap_or(UNKNOWN)
        )
    }
}

/// Fetch the locations page and map each lowercased library name to its detail URL.
pub async fn build_library_index<T: Transport, S: CacheStorage>(
    fetcher: &CachedFetcher<T, S>, index_url: &str, site_url: &str,
) -> Result<BTreeMap<String, String>, Error> {
    let html = fetcher.fetch_text(index_url).await?;
    let index = parse_library_index(&html, site_url)?;
    tracing::debug!("indexed {} libraries from {}", index.len(), index_url);
    Ok(index)
}

/// Fetch one library detail page and parse it.
pub async fn fetch_library<T: Transport, S: CacheStorage>(
    fetcher: &CachedFetcher<T, S>, url: &str,
) -> Result<Library, Error> {
    let html = fetcher.fetch_text(url).await?;
    parse_library_page(&html).map_err(|e| match e {
        Error::ParseFailed(msg) => Error::ParseFailed(format!("{}: {}", url, msg)),
        other => other,
    })
}

fn selector(css: &str) -> Result<Selector, Error> {
    Selector::parse(css).map_err(|e| Error::ParseFailed(format!("bad selector {}: {}", css, e)))
}

/// Element text with runs of whitespace collapsed; `None` when blank.
fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<Vec<_>>().join(" ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() { None } else { Some(text) }
}
