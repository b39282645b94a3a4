//! URL query parameters as read by the list pages.
//!
//! Parsing is total: anything that is not a single string value for a key
//! simply reads as absent.

use std::collections::BTreeMap;

/// Flat view over a page's URL query string.
///
/// A key given more than once holds several values and is treated as absent
/// by [`QueryParams::get`], the way a router hands such keys over as arrays
/// that the filter readers ignore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` query string.
    ///
    /// A leading `?` is accepted.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    /// Parse the query part of a full page URL.
    ///
    /// Input that is not a URL is parsed as a bare query string instead.
    #[must_use]
    pub fn from_url(raw: &str) -> Self {
        match url::Url::parse(raw) {
            Ok(url) => url.query_pairs().into_owned().collect(),
            Err(_) => Self::parse(raw),
        }
    }

    /// Replace every value of `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), vec![value.into()]);
    }

    /// Add `value` to `key`, keeping earlier values.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    /// Set `key` only when it is not present at all.
    pub fn set_default(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .entry(key.into())
            .or_insert_with(|| vec![value.into()]);
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// The single string value of `key`, if it has exactly one.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        match self.values.get(key).map(Vec::as_slice) {
            Some([value]) => Some(value.as_str()),
            _ => None,
        }
    }

    /// The single value of `key` when it is non-empty.
    #[must_use]
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    /// Comma-separated values of `key`, with empty segments dropped.
    #[must_use]
    pub fn list(&self, key: &str) -> Vec<&str> {
        self.get(key)
            .map(|value| value.split(',').filter(|part| !part.is_empty()).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.append(key, value);
        }
        params
    }
}
