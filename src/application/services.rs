use crate::application::builders::request_assembler::RequestAssembler;
use crate::application::variables::{Environment, resolve_variables};
use crate::domain::entities::{Request, Response};
use crate::domain::workspace::Workspace;
use anyhow::Result;
use async_trait::async_trait;

/// Trait for HTTP clients to enable mocking and dependency inversion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response>;
}

/// Application service for orchestrating HTTP request workflows
pub struct HttpRequestService {
    http_client: Box<dyn HttpClient>,
}

impl HttpRequestService {
    pub fn new(http_client: Box<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    /// Validates and sends a concrete request
    pub async fn send_request(&self, request: Request) -> Result<Response> {
        self.validate_request(&request)?;
        tracing::debug!("sending {} {}", request.method, request.url.as_str());

        let response = self.http_client.send(request).await?;
        if !response.is_success() {
            tracing::warn!("Status Code: {}", response.status.as_u16());
        }
        Ok(response)
    }

    fn validate_request(&self, request: &Request) -> Result<()> {
        RequestValidator::validate(request)
    }
}

/// Turns a named workspace request into a concrete request
///
/// `args` are the positional arguments following the request name. A
/// missing request surfaces as a `LookupError` inside the returned error.
pub fn resolve_named_request(
    workspace: &Workspace,
    name: &str,
    args: &[String],
    env: &dyn Environment,
) -> Result<Request> {
    let template = workspace.request(name)?;
    let vars = resolve_variables(&workspace.vars, args, env);
    tracing::debug!("resolved {} of {} variables", vars.len(), workspace.vars.len());

    let request = RequestAssembler::new(&workspace.defaults, &vars).assemble(name, template)?;
    Ok(request)
}

/// Domain rules a request must satisfy before it reaches the transport
pub struct RequestValidator;

impl RequestValidator {
    pub fn validate(request: &Request) -> Result<()> {
        Self::validate_url(request)
    }

    fn validate_url(request: &Request) -> Result<()> {
        let url = &request.url;
        if url.is_origin_form() {
            if !request.headers.contains("Host") {
                return Err(anyhow::anyhow!(
                    "Request target '{}' needs a Host header",
                    url.as_str()
                ));
            }
            return Ok(());
        }

        let url_str = url.as_str();
        if !url_str.starts_with("http://") && !url_str.starts_with("https://") {
            return Err(anyhow::anyhow!("URL must start with http:// or https://"));
        }
        Ok(())
    }
}
