//! Yelp business search response types and normalization.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shelfmap_core::Error;

/// Raw response from the Yelp business search endpoint.
#[derive(Debug, Deserialize)]
pub struct YelpApiResponse {
    #[serde(default)]
    pub businesses: Vec<Business>,
    #[serde(default)]
    pub total: u64,
}

/// Individual business from Yelp.
#[derive(Debug, Deserialize)]
pub struct Business {
    pub name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub location: Option<BusinessLocation>,
    #[serde(default)]
    pub display_phone: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BusinessLocation {
    #[serde(default)]
    pub display_address: Vec<String>,
}

/// Normalized search results.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchResults {
    pub total: u64,
    pub restaurants: Vec<Restaurant>,
}

/// Normalized restaurant entry.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Restaurant {
    pub rank: usize,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Meters from the search location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<YelpApiResponse> for SearchResults {
    fn from(raw: YelpApiResponse) -> Self {
        let restaurants = raw
            .businesses
            .into_iter()
            .enumerate()
            .map(|(idx, b)| Restaurant {
                rank: idx + 1,
                name: b.name,
                rating: b.rating,
                price: b.price,
                address: b
                    .location
                    .map(|l| l.display_address.join(", "))
                    .filter(|a| !a.is_empty()),
                phone: b.display_phone.filter(|p| !p.is_empty()),
                distance: b.distance,
                url: b.url,
            })
            .collect();

        SearchResults { total: raw.total, restaurants }
    }
}

impl SearchResults {
    /// Decode a cached or freshly fetched response value.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        let raw: YelpApiResponse =
            serde_json::from_value(value).map_err(|e| Error::DecodeFailed(format!("yelp search response: {}", e)))?;
        Ok(raw.into())
    }

    pub fn result_count(&self) -> usize {
        self.restaurants.len()
    }
}

impl Restaurant {
    /// One-line summary for display.
    pub fn summary(&self) -> String {
        let mut line = format!("{}. {}", self.rank, self.name);
        if let Some(rating) = self.rating {
            line.push_str(&format!(" ({:.1}*)", rating));
        }
        if let Some(price) = &self.price {
            line.push_str(&format!(" {}", price));
        }
        if let Some(address) = &self.address {
            line.push_str(&format!(" - {}", address));
        }
        if let Some(phone) = &self.phone {
            line.push_str(&format!(" [{}]", phone));
        }
        line
    }
}
