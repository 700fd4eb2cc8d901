//! Cache key construction.
//!
//! Page fetches are keyed by their URL verbatim. Parameterized calls are keyed
//! by `base?name=value&...` with the pairs sorted by the whole `name=value`
//! string, so insertion order never changes the key.

/// Cache key for a plain page fetch: the URL itself.
pub fn page_key(url: &str) -> String {
    url.to_string()
}

/// Cache key for a parameterized request.
///
/// Pairs are rendered as `name=value` and sorted on that rendered string, not
/// on the name alone. The two orders differ when a name is a prefix of another
/// name and the next byte sorts below `=` (e.g. `a` vs `a-b`); the rendered
/// order is the one existing cache files were written with.
pub fn composite_key<I, K, V>(base_url: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<String> = params
        .into_iter()
        .map(|(name, value)| format!("{}={}", name.as_ref(), value.as_ref()))
        .collect();
    pairs.sort();

    format!("{}?{}", base_url, pairs.join("&"))
}
