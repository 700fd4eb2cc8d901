//! Yelp Fusion business search.
//!
//! ### API
//!
//! - **Endpoint**: `https://api.yelp.com/v3/businesses/search`
//! - **Authentication**: the `key` query parameter.
//! - **Caching**: every search goes through `CachedFetcher::fetch_structured`,
//!   so identical parameters are requested once, whatever their order.
//! - **Normalization**: the raw response is decoded after the cache into
//!   `SearchResults`. A stored response that no longer decodes stays cached.

pub mod request;
pub mod response;

pub use request::BusinessSearch;
pub use response::{Restaurant, SearchResults};

use shelfmap_core::{CacheStorage, Error};

use crate::fetch::{CachedFetcher, Transport};
use crate::library::Library;

/// Default Yelp business search endpoint.
pub const DEFAULT_SEARCH_URL: &str = "https://api.yelp.com/v3/businesses/search";

/// Run one business search through the cache.
pub async fn search_nearby<T: Transport, S: CacheStorage>(
    fetcher: &CachedFetcher<T, S>, search_url: &str, search: &BusinessSearch,
) -> Result<SearchResults, Error> {
    search.validate()?;

    tracing::debug!("searching yelp: term={} location={}", search.term, search.location);

    let value = fetcher.fetch_structured(search_url, &search.to_params()).await?;
    let results = SearchResults::from_value(value)?;

    tracing::debug!("{} of {} restaurants returned", results.result_count(), results.total);
    Ok(results)
}

/// Restaurants within the default radius of a library.
pub async fn nearby_restaurants<T: Transport, S: CacheStorage>(
    fetcher: &CachedFetcher<T, S>, search_url: &str, api_key: &str, library: &Library,
) -> Result<SearchResults, Error> {
    let location = library
        .location
        .as_deref()
        .ok_or_else(|| Error::InvalidInput(format!("{} has no address to search around", library.name)))?;

    search_nearby(fetcher, search_url, &BusinessSearch::new(api_key, location)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::DEFAULT_HOURS;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use shelfmap_core::MemoryStorage;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct YelpStub {
        calls: AtomicUsize,
        sent: Mutex<Vec<(String, String)>>,
        body: Option<Value>,
    }

    #[async_trait]
    impl Transport for YelpStub {
        async fn get_text(&self, _url: &str) -> Result<String, Error> {
            Err(Error::HttpError("not used".into()))
        }

        async fn get_structured(&self, _base_url: &str, params: &[(String, String)]) -> Result<Value, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.sent.lock().unwrap() = params.to_vec();
            Ok(self
                .body
                .clone()
                .unwrap_or_else(|| json!({"businesses": [{"name": "Frita Batidos", "rating": 4.5}], "total": 1})))
        }
    }

    fn shapiro(location: Option<&str>) -> Library {
        Library {
            name: "Shapiro Library".into(),
            location: location.map(str::to_string),
            hours: DEFAULT_HOURS.into(),
            phone: None,
        }
    }

    async fn fetcher(stub: YelpStub) -> CachedFetcher<YelpStub, MemoryStorage> {
        CachedFetcher::open(stub, MemoryStorage::new(), Duration::ZERO).await
    }

    #[tokio::test]
    async fn test_nearby_restaurants() {
        let fetcher = fetcher(YelpStub::default()).await;
        let library = shapiro(Some("919 S. University Ave."));

        let results = nearby_restaurants(&fetcher, DEFAULT_SEARCH_URL, "secret", &library).await.unwrap();
        assert_eq!(results.total, 1);
        assert_eq!(results.restaurants[0].name, "Frita Batidos");

        let sent = fetcher.transport().sent.lock().unwrap().clone();
        assert!(sent.contains(&("location".to_string(), "919 S. University Ave.".to_string())));
        assert!(sent.contains(&("key".to_string(), "secret".to_string())));
    }

    #[tokio::test]
    async fn test_repeat_search_is_cached() {
        let fetcher = fetcher(YelpStub::default()).await;
        let library = shapiro(Some("919 S. University Ave."));

        nearby_restaurants(&fetcher, DEFAULT_SEARCH_URL, "secret", &library).await.unwrap();
        nearby_restaurants(&fetcher, DEFAULT_SEARCH_URL, "secret", &library).await.unwrap();

        assert_eq!(fetcher.transport().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_library_without_location() {
        let fetcher = fetcher(YelpStub::default()).await;

        let result = nearby_restaurants(&fetcher, DEFAULT_SEARCH_URL, "secret", &shapiro(None)).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(fetcher.transport().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_search_never_fetches() {
        let fetcher = fetcher(YelpStub::default()).await;
        let search = BusinessSearch { limit: 0, ..BusinessSearch::new("secret", "Ann Arbor") };

        assert!(search_nearby(&fetcher, DEFAULT_SEARCH_URL, &search).await.is_err());
        assert_eq!(fetcher.cached_entries().await, 0);
    }

    #[tokio::test]
    async fn test_undecodable_response_stays_cached() {
        let stub = YelpStub { body: Some(json!({"businesses": 7})), ..Default::default() };
        let fetcher = fetcher(stub).await;
        let search = BusinessSearch::new("secret", "Ann Arbor");

        let result = search_nearby(&fetcher, DEFAULT_SEARCH_URL, &search).await;
        assert!(matches!(result, Err(Error::DecodeFailed(_))));
        assert!(fetcher.has_structured(DEFAULT_SEARCH_URL, &search.to_params()).await);
    }
}
