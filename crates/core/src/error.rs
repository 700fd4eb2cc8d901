//! Unified error types for shelfmap.
//!
//! Every variant carries an upper-snake code prefix so log lines and driver
//! output stay greppable.

/// Unified error types for the shelfmap crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., a library without an address).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Network failure or non-success HTTP status.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Response body could not be decoded as structured data.
    #[error("DECODE_FAILED: {0}")]
    DecodeFailed(String),

    /// Expected element missing from an HTML page.
    #[error("PARSE_FAILED: {0}")]
    ParseFailed(String),

    /// Cache storage could not be read.
    #[error("CACHE_READ: {0}")]
    CacheRead(String),

    /// Cache store could not be serialized.
    #[error("CACHE_ENCODE: {0}")]
    CacheEncode(String),

    /// Cache storage could not be written.
    #[error("CACHE_WRITE: {0}")]
    CacheWrite(String),
}
