//! Advisory warnings carried by the `X-Cf-Warnings` response header.

use reqwest::header::HeaderMap;
use url::form_urlencoded;

/// Response header carrying comma-separated, URL-encoded warnings.
pub const WARNINGS_HEADER: &str = "X-Cf-Warnings";

/// Ordered accumulator of warnings collected across API calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warnings(Vec<String>);

impl Warnings {
    /// Empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a single warning.
    pub fn push(&mut self, warning: impl Into<String>) {
        self.0.push(warning.into());
    }

    /// Append every warning from `other`, preserving order.
    pub fn extend(&mut self, other: impl IntoIterator<Item = String>) {
        self.0.extend(other);
    }

    /// Iterate over the collected warnings.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// True when nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of collected warnings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Collected warnings as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Append the warnings found in a response's headers.
    pub(crate) fn collect_from(&mut self, headers: &HeaderMap) {
        self.0.extend(parse_warnings(headers));
    }
}

impl FromIterator<String> for Warnings {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Warnings {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

fn parse_warnings(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(WARNINGS_HEADER)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(','))
        .map(str::trim)
        .filter(|encoded| !encoded.is_empty())
        .map(decode_warning)
        .collect()
}

fn decode_warning(encoded: &str) -> String {
    form_urlencoded::parse(encoded.as_bytes())
        .map(|(key, value)| {
            if value.is_empty() {
                key.into_owned()
            } else {
                format!("{key}={value}")
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}
