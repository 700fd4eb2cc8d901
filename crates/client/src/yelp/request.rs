//! Yelp business search request parameters and validation.

use shelfmap_core::Error;
use std::collections::HashMap;

/// Largest radius Yelp accepts, in meters.
const MAX_RADIUS: u32 = 40_000;

/// Parameters for one business search.
///
/// The credential travels as the `key` query parameter, so it is part of the
/// cache key like every other parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessSearch {
    /// Yelp Fusion API key.
    pub api_key: String,

    /// Search term (default "restaurants").
    pub term: String,

    /// Free-form address the search is centered on.
    pub location: String,

    /// Search radius in meters (default 100, max 40000).
    pub radius: u32,

    /// Number of businesses to return (1-50, default 10).
    pub limit: u8,
}

impl Default for BusinessSearch {
    fn default() -> Self {
        Self { api_key: String::new(), term: "restaurants".into(), location: String::new(), radius: 100, limit: 10 }
    }
}

impl BusinessSearch {
    /// Default restaurant search around `location`.
    pub fn new(api_key: impl Into<String>, location: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), location: location.into(), ..Default::default() }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.api_key.trim().is_empty() {
            return Err(Error::InvalidInput("API key cannot be empty".into()));
        }

        if self.term.trim().is_empty() {
            return Err(Error::InvalidInput("search term cannot be empty".into()));
        }

        if self.location.trim().is_empty() {
            return Err(Error::InvalidInput("location cannot be empty".into()));
        }

        if self.radius > MAX_RADIUS {
            return Err(Error::InvalidInput(format!("radius {} exceeds {} meters", self.radius, MAX_RADIUS)));
        }

        if !(1..=50).contains(&self.limit) {
            return Err(Error::InvalidInput(format!("limit {} must be 1-50", self.limit)));
        }

        Ok(())
    }

    /// Query parameters in the form the cache keys and the transport sends.
    pub fn to_params(&self) -> HashMap<String, String> {
        HashMap::from([
            ("key".to_string(), self.api_key.clone()),
            ("term".to_string(), self.term.clone()),
            ("location".to_string(), self.location.clone()),
            ("radius".to_string(), self.radius.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ])
    }
}
