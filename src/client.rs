//! SparqlClient — runs one query against one SPARQL endpoint
//!
//! Sends the query as the `query` parameter of an HTTP GET and decodes the
//! SPARQL JSON results body.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{StatusCode, Url};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{SparqlError, SparqlResult};
use crate::results::QueryResults;
use crate::transport::{HttpRequest, ReqwestTransport, Transport};

/// `User-Agent` sent unless overridden
pub const DEFAULT_AGENT: &str = concat!("spargo/", env!("CARGO_PKG_VERSION"));

/// `Accept` header sent unless overridden
pub const DEFAULT_ACCEPT: &str = "application/sparql-results+json";

/// Client for a SPARQL endpoint.
///
/// Configure with [`init`](Self::init), then call [`execute`](Self::execute).
/// The same client can be re-initialised for an unrelated query.
///
/// # Example
/// ```no_run
/// # use spargo::SparqlClient;
/// # async fn run() -> spargo::SparqlResult<()> {
/// let mut client = SparqlClient::new();
/// client.init("https://query.wikidata.org/sparql", "SELECT ?s WHERE { ?s ?p ?o } LIMIT 1");
/// let results = client.execute().await?;
/// println!("{}", results.human());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct SparqlClient {
    base_url: String,
    query: String,
    agent: String,
    accept: String,
    transport: Option<Arc<dyn Transport>>,
}

impl SparqlClient {
    /// Create an unconfigured client
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client that sends requests through `transport`
    pub fn with_transport<T: Transport + 'static>(transport: T) -> Self {
        Self {
            transport: Some(Arc::new(transport)),
            ..Self::default()
        }
    }

    /// Build a client from a [`ClientConfig`]
    pub fn from_config(config: &ClientConfig) -> SparqlResult<Self> {
        let mut client = match config.timeout_secs {
            Some(secs) => {
                let transport = ReqwestTransport::with_timeout(Duration::from_secs(secs))
                    .map_err(SparqlError::Transport)?;
                Self::with_transport(transport)
            }
            None => Self::new(),
        };

        if let Some(agent) = &config.user_agent {
            client.set_agent(agent.clone());
        }
        if let Some(accept) = &config.accept {
            client.set_accept(accept.clone());
        }
        client.init(&config.endpoint, &config.query);
        Ok(client)
    }

    /// Set the endpoint and query.
    ///
    /// Both values are stored verbatim and replace any previous ones. Agent and
    /// accept fall back to their defaults when unset, and the default
    /// transport is created if none was injected. Nothing is sent.
    pub fn init(&mut self, base_url: &str, query: &str) {
        self.base_url = base_url.to_string();
        self.query = query.to_string();

        if self.agent.is_empty() {
            self.agent = DEFAULT_AGENT.to_string();
        }
        if self.accept.is_empty() {
            self.accept = DEFAULT_ACCEPT.to_string();
        }
        if self.transport.is_none() {
            self.transport = Some(Arc::new(ReqwestTransport::new()));
        }
    }

    pub fn set_agent(&mut self, agent: impl Into<String>) {
        self.agent = agent.into();
    }

    pub fn set_accept(&mut self, accept: impl Into<String>) {
        self.accept = accept.into();
    }

    pub fn set_transport<T: Transport + 'static>(&mut self, transport: T) {
        self.transport = Some(Arc::new(transport));
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    pub fn accept(&self) -> &str {
        &self.accept
    }

    /// Send the configured query and decode the response.
    ///
    /// Only a 200 response is decoded. Every failure is returned as a
    /// [`SparqlError`]; nothing is retried.
    pub async fn execute(&self) -> SparqlResult<QueryResults> {
        let request = self.build_request()?;
        debug!("Querying {}", request.url);

        let response = match &self.transport {
            Some(transport) => transport.get(request).await,
            None => ReqwestTransport::new().get(request).await,
        }
        .map_err(SparqlError::Transport)?;

        if response.status != StatusCode::OK {
            warn!("Endpoint {} returned {}", self.base_url, response.status);
            return Err(SparqlError::Response {
                status: response.status.as_u16(),
            });
        }

        let results = QueryResults::from_json(&response.body)?;
        debug!("Decoded {} row(s)", results.len());
        Ok(results)
    }

    fn build_request(&self) -> SparqlResult<HttpRequest> {
        let url = Url::parse_with_params(&self.base_url, &[("query", &self.query)])
            .map_err(SparqlError::transport)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, header_value(&self.accept, DEFAULT_ACCEPT)?);
        headers.insert(USER_AGENT, header_value(&self.agent, DEFAULT_AGENT)?);

        Ok(HttpRequest { url, headers })
    }
}

fn header_value(value: &str, fallback: &str) -> SparqlResult<HeaderValue> {
    let value = if value.is_empty() { fallback } else { value };
    HeaderValue::from_str(value).map_err(SparqlError::transport)
}

impl fmt::Debug for SparqlClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparqlClient")
            .field("base_url", &self.base_url)
            .field("query", &self.query)
            .field("agent", &self.agent)
            .field("accept", &self.accept)
            .field("transport", &self.transport.is_some())
            .finish()
    }
}
