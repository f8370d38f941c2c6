//! spargo — a client for SPARQL endpoints
//!
//! Sends a query to an endpoint over HTTP GET and decodes the SPARQL 1.1 JSON
//! results into [`QueryResults`], together with a canonical human-readable
//! rendering.
//!
//! - **`SparqlClient`** — configuration plus the request/decode pipeline
//! - **`Transport`** — the HTTP exchange, `ReqwestTransport` by default
//! - **`QueryResults`** — head, ordered rows and the human rendering
//!
//! # Quick Start
//!
//! ```no_run
//! use spargo::SparqlClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut client = SparqlClient::new();
//!     client.init(
//!         "https://query.wikidata.org/sparql",
//!         "SELECT ?item WHERE { ?item wdt:P31 wd:Q146 } LIMIT 3",
//!     );
//!
//!     match client.execute().await {
//!         Ok(results) => println!("{}", results.human()),
//!         Err(e) => eprintln!("{}", e),
//!     }
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod results;
pub mod transport;

pub use client::{SparqlClient, DEFAULT_ACCEPT, DEFAULT_AGENT};
pub use config::{ClientConfig, ConfigError};
pub use error::{BoxError, SparqlError, SparqlResult};
pub use results::{QueryResults, Row, Term};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
