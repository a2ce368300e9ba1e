use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating, decoding or interpreting the workspace
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not find any config file (tried {tried})")]
    NotFound { tried: String },

    #[error("cannot read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode config file '{}': {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    #[error("request '{name}' has an empty route")]
    EmptyRoute { name: String },

    #[error("request '{name}' uses unsupported method '{method}'")]
    UnsupportedMethod { name: String, method: String },
}

/// Errors raised by placeholder expansion
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unclosed placeholder starting at offset {offset}")]
    Unclosed { offset: usize },

    #[error("empty placeholder at offset {offset}")]
    Empty { offset: usize },

    #[error("invalid placeholder '{{{{{content}}}}}'")]
    InvalidName { content: String },

    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String },
}

/// Errors raised by the raw request parser
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no valid method found")]
    NoValidMethod,

    #[error("invalid headers: '{line}'")]
    InvalidHeaders { line: String },

    #[error("empty request target")]
    EmptyTarget,
}

/// A request name that the workspace does not declare
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("no such request '{name}'")]
pub struct LookupError {
    pub name: String,
    pub available: Vec<String>,
}

/// Errors raised while assembling a request from the workspace
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("cannot expand {field}: {source}")]
    Template {
        field: String,
        #[source]
        source: TemplateError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AssembleError {
    pub fn template(field: impl Into<String>, source: TemplateError) -> Self {
        AssembleError::Template {
            field: field.into(),
            source,
        }
    }
}
