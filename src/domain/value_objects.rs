use anyhow::{Result, anyhow};
use serde_json::Value;

/// A request URL or, for hand-written requests, the literal request target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url(String);

impl Url {
    /// Creates a new Url, rejecting the empty string
    ///
    /// # Arguments
    /// * `url` - The URL or request target
    ///
    /// # Returns
    /// * `Ok(Url)` - Non-empty URL
    /// * `Err(anyhow::Error)` - If the URL is empty
    pub fn new(url: &str) -> Result<Self> {
        if url.is_empty() {
            return Err(anyhow!("URL cannot be empty"));
        }
        Ok(Url(url.to_string()))
    }

    /// Returns the URL as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for targets such as `/users?id=1` that carry no scheme or host
    pub fn is_origin_form(&self) -> bool {
        self.0.starts_with('/')
    }
}

/// Ordered, multi-valued header collection
///
/// Appending never replaces an existing entry, so repeated names reach the
/// wire in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList(Vec<(String, String)>);

impl HeaderList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// All values for `name`, compared case-insensitively
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// First value for `name`
    pub fn get<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        self.get_all(name).next()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for HeaderList {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        HeaderList(iter.into_iter().collect())
    }
}

/// Raw request or response body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body(pub Vec<u8>);

impl Body {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the body parses as a JSON object or array
    pub fn is_json(&self) -> bool {
        matches!(
            serde_json::from_slice::<Value>(&self.0),
            Ok(Value::Object(_) | Value::Array(_))
        )
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body(text.into_bytes())
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body(text.as_bytes().to_vec())
    }
}
