//! Client code for shelfmap.
//!
//! This crate provides the HTTP transport, the cached fetch layer, the library
//! directory scraper and the Yelp restaurant search used by the CLI.

pub mod fetch;
pub mod library;
pub mod yelp;

pub use fetch::{CachedFetcher, FetchConfig, HttpTransport, Transport};
pub use library::{Library, build_library_index, fetch_library};
pub use yelp::{BusinessSearch, Restaurant, SearchResults, nearby_restaurants, search_nearby};
