//! Locations index page.

use scraper::Html;
use shelfmap_core::Error;
use std::collections::BTreeMap;

use super::{element_text, selector};
use crate::fetch::{parse_fetch_url, resolve_link};

/// Map lowercased library names to absolute detail-page URLs.
///
/// Entries missing a name or a usable link are skipped. Later duplicates of a
/// name replace earlier ones.
pub fn parse_library_index(html: &str, site_url: &str) -> Result<BTreeMap<String, String>, Error> {
    let site = parse_fetch_url(site_url).map_err(|e| Error::InvalidUrl(e.to_string()))?;

    let document = Html::parse_document(html);
    let items = selector("li.css-77qsxv")?;
    let span = selector("span")?;
    let anchor = selector("a[href]")?;

    let mut index = BTreeMap::new();

    for item in document.select(&items) {
        let Some(name) = item.select(&span).next().and_then(element_text) else {
            continue;
        };

        let Some(href) = item.select(&anchor).next().and_then(|a| a.value().attr("href")) else {
            continue;
        };

        match resolve_link(&site, href) {
            Ok(url) => {
                index.insert(name.to_lowercase(), url.to_string());
            }
            Err(e) => tracing::debug!("skipping {}: {}", name, e),
        }
    }

    Ok(index)
}
