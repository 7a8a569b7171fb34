use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use url::Url;

use crate::config::ClientConfig;
use crate::endpoint::{RawResponse, Request};
use crate::error::{ConfigError, TransportError, TransportErrorKind};

/// Performs a GET and hands back the status and body untouched.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: &Request) -> Result<RawResponse, TransportError>;
}

/// Blocking counterpart of [`Transport`].
pub trait BlockingTransport {
    fn get(&self, request: &Request) -> Result<RawResponse, TransportError>;
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("sumo-api/", env!("CARGO_PKG_VERSION"))),
    );
    headers
}

fn resolve(base: &Url, request: &Request) -> Result<Url, TransportError> {
    request
        .url(base)
        .map_err(|e| TransportError::new(TransportErrorKind::Request, request.path.clone(), e))
}

/// reqwest-backed async transport. Cloning shares the connection pool.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder()
            .default_headers(default_headers())
            .timeout(config.timeout());
        if !config.prefer_http2() {
            builder = builder.http1_only();
        }

        Ok(Self {
            client: builder.build().map_err(ConfigError::HttpClient)?,
            base_url: config.base_url().clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(level = "debug", skip_all, fields(path = %request.path, status))]
    async fn get(&self, request: &Request) -> Result<RawResponse, TransportError> {
        let url = resolve(&self.base_url, request)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(url.as_str(), e))?;

        let status = response.status().as_u16();
        tracing::Span::current().record("status", status);

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(url.as_str(), e))?;
        Ok(RawResponse { status, body })
    }
}

/// reqwest-backed blocking transport.
///
/// Must not be created or used from inside an async runtime; reqwest's
/// blocking client runs its own.
#[derive(Clone, Debug)]
pub struct BlockingHttpTransport {
    client: reqwest::blocking::Client,
    base_url: Url,
}

impl BlockingHttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let mut builder = reqwest::blocking::Client::builder()
            .default_headers(default_headers())
            .timeout(config.timeout());
        if !config.prefer_http2() {
            builder = builder.http1_only();
        }

        Ok(Self {
            client: builder.build().map_err(ConfigError::HttpClient)?,
            base_url: config.base_url().clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl BlockingTransport for BlockingHttpTransport {
    #[tracing::instrument(level = "debug", skip_all, fields(path = %request.path, status))]
    fn get(&self, request: &Request) -> Result<RawResponse, TransportError> {
        let url = resolve(&self.base_url, request)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| TransportError::from_reqwest(url.as_str(), e))?;

        let status = response.status().as_u16();
        tracing::Span::current().record("status", status);

        let body = response
            .text()
            .map_err(|e| TransportError::from_reqwest(url.as_str(), e))?;
        Ok(RawResponse { status, body })
    }
}
