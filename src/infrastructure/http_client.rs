use crate::application::services::{HttpClient, HttpRequestService};
use crate::domain::entities::{Method as DomainMethod, Request, Response};
use crate::domain::value_objects::{Body, HeaderList};

use anyhow::Result;
use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::client::conn::http1;
use hyper::header::{CONTENT_TYPE, HOST, HeaderValue};
use hyper::{Method, Request as HyperRequest, Uri};
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_native_tls::{TlsConnector, native_tls};

/// Failures between handing a request to the transport and reading the reply
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("URL '{0}' has no host")]
    MissingHost(String),

    #[error("Unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("Cannot connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TLS handshake with {host} failed: {source}")]
    Tls {
        host: String,
        #[source]
        source: native_tls::Error,
    },

    #[error("Failed to build HTTP request: {0}")]
    Build(#[from] http::Error),

    #[error("HTTP request execution failed: {0}")]
    Http(#[from] hyper::Error),
}

/// Infrastructure implementation of HttpClient using Hyper
///
/// Opens one HTTP/1 connection per request, over TLS for `https` URLs.
/// There is no retry and no timeout.
pub struct HyperHttpClient;

impl HyperHttpClient {
    pub fn new() -> Self {
        Self
    }

    /// Creates a configured HTTP request service using this client
    pub fn create_request_service(self) -> HttpRequestService {
        HttpRequestService::new(Box::new(self))
    }
}

impl Default for HyperHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn send(&self, request: Request) -> Result<Response> {
        let target = UriAdapter::to_target(&request)?;
        let hyper_request = RequestAdapter::to_hyper_request(request, &target)?;
        let response = self.execute_http_request(&target, hyper_request).await?;
        Ok(response)
    }
}

impl HyperHttpClient {
    async fn execute_http_request(
        &self,
        target: &Target,
        request: HyperRequest<Full<Bytes>>,
    ) -> Result<Response, TransportError> {
        let addr = format!("{}:{}", target.host, target.port);
        let tcp = TcpStream::connect((target.connect_host(), target.port))
            .await
            .map_err(|source| TransportError::Connect {
                addr: addr.clone(),
                source,
            })?;
        tracing::debug!("connected to {}", addr);

        if !target.https {
            return Self::exchange(TokioIo::new(tcp), request).await;
        }

        let tls_error = |source: native_tls::Error| TransportError::Tls {
            host: target.host.clone(),
            source,
        };
        let connector = TlsConnector::from(native_tls::TlsConnector::new().map_err(tls_error)?);
        let stream = connector
            .connect(target.connect_host(), tcp)
            .await
            .map_err(tls_error)?;
        Self::exchange(TokioIo::new(stream), request).await
    }

    async fn exchange<T>(io: T, request: HyperRequest<Full<Bytes>>) -> Result<Response, TransportError>
    where
        T: hyper::rt::Read + hyper::rt::Write + Unpin + Send + 'static,
    {
        let (mut sender, connection) = http1::handshake(io).await?;
        tokio::spawn(async move {
            if let Err(err) = connection.await {
                tracing::debug!("connection closed with error: {}", err);
            }
        });

        let response = sender.send_request(request).await?;
        ResponseAdapter::to_domain_response(response).await
    }
}

/// Where a request goes, derived from its URL (or Host header for `/path` targets)
#[derive(Debug)]
struct Target {
    https: bool,
    host: String,
    port: u16,
    host_header: String,
    path_and_query: String,
}

impl Target {
    fn connect_host(&self) -> &str {
        self.host.trim_start_matches('[').trim_end_matches(']')
    }
}

/// Adapter for converting domain URLs to connection targets
struct UriAdapter;

impl UriAdapter {
    fn to_target(request: &Request) -> Result<Target, TransportError> {
        let raw = if request.url.is_origin_form() {
            let host = request
                .headers
                .get("Host")
                .ok_or_else(|| TransportError::MissingHost(request.url.as_str().to_string()))?;
            format!("http://{}{}", host, request.url.as_str())
        } else {
            request.url.as_str().to_string()
        };

        let uri = raw.parse::<Uri>().map_err(|e| TransportError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        let https = match uri.scheme_str() {
            Some("http") => false,
            Some("https") => true,
            other => return Err(TransportError::UnsupportedScheme(other.unwrap_or("").to_string())),
        };
        let host = uri
            .host()
            .ok_or_else(|| TransportError::MissingHost(raw.clone()))?
            .to_string();
        let port = uri.port_u16().unwrap_or(if https { 443 } else { 80 });
        let host_header = match uri.port_u16() {
            Some(port) => format!("{}:{}", host, port),
            None => host.clone(),
        };
        let path_and_query = uri
            .path_and_query()
            .map(|p| p.as_str())
            .filter(|p| !p.is_empty())
            .unwrap_or("/")
            .to_string();

        Ok(Target {
            https,
            host,
            port,
            host_header,
            path_and_query,
        })
    }
}

/// Adapter for converting domain requests to Hyper requests
struct RequestAdapter;

impl RequestAdapter {
    fn to_hyper_request(
        domain_request: Request,
        target: &Target,
    ) -> Result<HyperRequest<Full<Bytes>>, TransportError> {
        let mut builder = HyperRequest::builder()
            .method(MethodAdapter::to_hyper_method(domain_request.method))
            .uri(target.path_and_query.as_str());

        if !domain_request.headers.contains(HOST.as_str()) {
            builder = builder.header(HOST, target.host_header.as_str());
        }
        for (name, value) in domain_request.headers.iter() {
            builder = builder.header(name, value);
        }
        builder = HeaderAdapter::add_json_content_type(
            builder,
            &domain_request.headers,
            &domain_request.body,
        );

        Ok(builder.body(BodyAdapter::to_hyper_body(domain_request.body))?)
    }
}

/// Adapter for converting domain responses from Hyper responses
struct ResponseAdapter;

impl ResponseAdapter {
    async fn to_domain_response(
        hyper_response: hyper::Response<Incoming>,
    ) -> Result<Response, TransportError> {
        let status = hyper_response.status();
        let headers = hyper_response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = Self::extract_response_body(hyper_response).await?;

        Ok(Response {
            status,
            headers,
            body,
        })
    }

    async fn extract_response_body(response: hyper::Response<Incoming>) -> Result<Body, TransportError> {
        let body_bytes = response.into_body().collect().await?.to_bytes();
        Ok(Body(body_bytes.to_vec()))
    }
}

/// Adapter for converting domain HTTP methods to Hyper methods
struct MethodAdapter;

impl MethodAdapter {
    fn to_hyper_method(domain_method: DomainMethod) -> Method {
        match domain_method {
            DomainMethod::Get => Method::GET,
            DomainMethod::Head => Method::HEAD,
            DomainMethod::Post => Method::POST,
            DomainMethod::Put => Method::PUT,
            DomainMethod::Patch => Method::PATCH,
            DomainMethod::Delete => Method::DELETE,
            DomainMethod::Connect => Method::CONNECT,
            DomainMethod::Options => Method::OPTIONS,
            DomainMethod::Trace => Method::TRACE,
        }
    }
}

/// Adapter for converting domain request bodies to Hyper bodies
struct BodyAdapter;

impl BodyAdapter {
    fn to_hyper_body(domain_body: Option<Body>) -> Full<Bytes> {
        match domain_body {
            Some(body) => Full::new(Bytes::from(body.0)),
            None => Full::new(Bytes::new()),
        }
    }
}

/// Adapter for handling HTTP headers
struct HeaderAdapter;

impl HeaderAdapter {
    fn add_json_content_type(
        builder: http::request::Builder,
        headers: &HeaderList,
        body: &Option<Body>,
    ) -> http::request::Builder {
        match body {
            Some(body) if !headers.contains(CONTENT_TYPE.as_str()) && body.is_json() => {
                builder.header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            }
            _ => builder,
        }
    }
}
