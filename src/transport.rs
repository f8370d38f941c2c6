//! Transport — the HTTP exchange behind [`SparqlClient`](crate::SparqlClient)
//!
//! `ReqwestTransport` is used in production. Tests swap in a scripted
//! implementation so no request ever leaves the process.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode, Url};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::BoxError;

/// A fully built GET request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Endpoint URL including the `query` parameter
    pub url: Url,
    /// Request headers (`Accept`, `User-Agent`)
    pub headers: HeaderMap,
}

/// Status and body of an endpoint response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends a single HTTP GET and returns the complete response.
///
/// Timeouts, connection pooling and TLS are the implementation's concern.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, BoxError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        (**self).get(request).await
    }
}

/// Default transport backed by `reqwest`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Transport whose requests fail once `timeout` has elapsed
    pub fn with_timeout(timeout: Duration) -> Result<Self, BoxError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Reuse an already configured `reqwest::Client`
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        let response = self
            .client
            .get(request.url)
            .headers(request.headers)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        debug!("Received {} ({} bytes)", status, body.len());

        Ok(HttpResponse { status, body })
    }
}
