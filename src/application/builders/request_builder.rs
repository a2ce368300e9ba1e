use crate::domain::entities::{Method, Request};
use crate::domain::value_objects::{Body, HeaderList, Url};
use anyhow::{Result, anyhow};

/// Accumulates the parts of a concrete request
///
/// Shared by the workspace assembler and the raw request parser so both
/// produce the same `Request` shape.
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    url: Option<Url>,
    headers: HeaderList,
    body: Option<Body>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn url(mut self, raw_url: &str) -> Result<Self> {
        self.url = Some(Url::new(raw_url)?);
        Ok(self)
    }

    /// Appends a header, keeping any earlier value under the same name
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn body(mut self, body: Option<Body>) -> Self {
        self.body = body.filter(|b| !b.is_empty());
        self
    }

    pub fn build(self) -> Result<Request> {
        Ok(Request {
            method: self.method.unwrap_or(Method::Get),
            url: self.url.ok_or_else(|| anyhow!("URL is required"))?,
            headers: self.headers,
            body: self.body,
        })
    }
}
