//! Query-string and URL construction.
//!
//! Parameters are held in a `BTreeMap`, so iteration is already in ascending
//! key order and the same mapping always yields the same URL or form body.
//! Values are percent-encoded per RFC 3986 (space becomes `%20`, never `+`);
//! keys are emitted as given.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Query or form parameters with unique keys, kept sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, replacing any previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Builder-style `insert`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Serialize `params` as `k1=v1&k2=v2` in ascending key order.
pub fn build_query_string(params: &QueryParams) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Join `base_url` and `path`, appending `?query` only when `params` is
/// non-empty. Identifiers inside `path` are not validated.
pub fn build_url(base_url: &str, path: &str, params: &QueryParams) -> String {
    if params.is_empty() {
        format!("{base_url}{path}")
    } else {
        format!("{base_url}{path}?{}", build_query_string(params))
    }
}
