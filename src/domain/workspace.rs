//! Workspace schema: variables, request defaults and named request templates.

use crate::domain::errors::LookupError;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Where a variable's runtime value comes from
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VariableSource {
    /// The declared `value`, verbatim
    Plain,
    /// A process environment variable, falling back to `value`
    Process,
    /// A positional CLI argument, falling back to `value`
    Args,
    /// Any other source; such variables never resolve
    #[default]
    #[serde(other)]
    Unrecognized,
}

/// Declaration of one named variable
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct VariableSpec {
    pub source: VariableSource,
    pub name: String,
    pub index: usize,
    pub value: String,
}

/// An unresolved request description; every string is a template
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RequestTemplate {
    pub method: String,
    pub route: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub query: BTreeMap<String, String>,
}

/// The decoded workspace document
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Workspace {
    pub vars: BTreeMap<String, VariableSpec>,
    pub defaults: RequestTemplate,
    pub requests: BTreeMap<String, RequestTemplate>,
}

impl Workspace {
    pub fn request(&self, name: &str) -> Result<&RequestTemplate, LookupError> {
        self.requests.get(name).ok_or_else(|| LookupError {
            name: name.to_string(),
            available: self.request_names(),
        })
    }

    pub fn request_names(&self) -> Vec<String> {
        self.requests.keys().cloned().collect()
    }
}
