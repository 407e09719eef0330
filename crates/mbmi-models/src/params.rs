//! Request query-string parameters.

use mbmi_filter::Filter;

/// Page size applied when a request names none.
pub const DEFAULT_LIMIT: u64 = 100;

/// Decoded `application/x-www-form-urlencoded` request parameters.
///
/// Lookups return the first value for a key, matching how list handlers
/// read their query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pairs: Vec<(String, String)>,
}

impl RequestParams {
    /// Parse a query string; a leading `?` is ignored.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    /// First value for `key`, possibly empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First non-empty value for `key`.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn unsigned(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    /// `limit`, when present and a valid unsigned integer.
    pub fn limit(&self) -> Option<u64> {
        self.unsigned("limit")
    }

    /// `offset`, when present and a valid unsigned integer.
    pub fn offset(&self) -> Option<u64> {
        self.unsigned("offset")
    }

    /// Requested sort column name.
    pub fn sort(&self) -> Option<&str> {
        self.non_empty("sort")
    }

    /// `dir=asc` / `dir=desc`, case-insensitive; anything else yields `default`.
    pub fn ascending(&self, default: bool) -> bool {
        match self.get("dir") {
            Some(dir) if dir.eq_ignore_ascii_case("asc") => true,
            Some(dir) if dir.eq_ignore_ascii_case("desc") => false,
            _ => default,
        }
    }

    /// Apply `limit`/`offset`, falling back to `default_limit` and offset 0.
    pub fn apply_paging(&self, filter: &mut Filter, default_limit: u64) {
        filter.limit(
            self.limit().unwrap_or(default_limit),
            self.offset().unwrap_or(0),
        );
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
