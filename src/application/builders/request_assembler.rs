use crate::application::builders::request_builder::RequestBuilder;
use crate::application::template::expand;
use crate::application::variables::ResolvedVariables;
use crate::domain::entities::{Method, Request};
use crate::domain::errors::{AssembleError, ConfigError};
use crate::domain::value_objects::Body;
use crate::domain::workspace::RequestTemplate;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Bytes that cannot appear as-is in a query name or value
///
/// `%` is left alone so values that are already percent-encoded go out
/// unchanged.
const QUERY_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'&')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Merges workspace defaults with a named request template
///
/// Headers from the defaults come first and the template's headers are
/// appended after them; repeated names keep every value. Query parameters
/// are keyed by name and the template's value wins. Method, route and body
/// only ever come from the template.
pub struct RequestAssembler<'a> {
    defaults: &'a RequestTemplate,
    vars: &'a ResolvedVariables,
}

impl<'a> RequestAssembler<'a> {
    pub fn new(defaults: &'a RequestTemplate, vars: &'a ResolvedVariables) -> Self {
        Self { defaults, vars }
    }

    /// Builds the concrete request for `template`, registered under `name`
    pub fn assemble(&self, name: &str, template: &RequestTemplate) -> Result<Request, AssembleError> {
        let method = Self::method(name, template)?;
        let route = self.route(name, template)?;

        let mut builder = RequestBuilder::new().method(method);
        for (header, value) in self.defaults.headers.iter().chain(template.headers.iter()) {
            let value = self.expand_field(&format!("header '{}'", header), value)?;
            builder = builder.header(header.clone(), value);
        }

        let query = self.query(template)?;
        let url = with_query(&route, &query);
        tracing::debug!("assembled {} {} for request '{}'", method, url, name);

        let body = if template.body.is_empty() {
            None
        } else {
            Some(Body::from(self.expand_field("body", &template.body)?))
        };

        let empty_route = || ConfigError::EmptyRoute {
            name: name.to_string(),
        };
        builder
            .url(&url)
            .map_err(|_| empty_route())?
            .body(body)
            .build()
            .map_err(|_| empty_route().into())
    }

    fn method(name: &str, template: &RequestTemplate) -> Result<Method, ConfigError> {
        let raw = template.method.trim();
        if raw.is_empty() {
            return Ok(Method::Get);
        }
        Method::from_str(raw).map_err(|_| ConfigError::UnsupportedMethod {
            name: name.to_string(),
            method: raw.to_string(),
        })
    }

    fn route(&self, name: &str, template: &RequestTemplate) -> Result<String, AssembleError> {
        let route = self.expand_field("route", &template.route)?;
        if route.trim().is_empty() {
            return Err(ConfigError::EmptyRoute {
                name: name.to_string(),
            }
            .into());
        }
        Ok(route)
    }

    fn query(&self, template: &RequestTemplate) -> Result<BTreeMap<String, String>, AssembleError> {
        let mut query = BTreeMap::new();
        for (key, value) in self.defaults.query.iter().chain(template.query.iter()) {
            let value = self.expand_field(&format!("query '{}'", key), value)?;
            query.insert(key.clone(), value);
        }
        Ok(query)
    }

    fn expand_field(&self, field: &str, value: &str) -> Result<String, AssembleError> {
        expand(value, self.vars).map_err(|e| AssembleError::template(field, e))
    }
}

/// Replaces the query of `route` with `name=value` pairs from `query`
///
/// Parameters are written in ascending name order. Only bytes that would
/// break the query are escaped. An empty `query` leaves the route untouched.
fn with_query(route: &str, query: &BTreeMap<String, String>) -> String {
    if query.is_empty() {
        return route.to_string();
    }

    let (without_fragment, fragment) = match route.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (route, None),
    };
    let base = without_fragment
        .split_once('?')
        .map_or(without_fragment, |(base, _)| base);

    let pairs: Vec<String> = query
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY_ENCODE_SET),
                utf8_percent_encode(value, QUERY_ENCODE_SET)
            )
        })
        .collect();

    let mut url = format!("{}?{}", base, pairs.join("&"));
    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(fragment);
    }
    url
}
