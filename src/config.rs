//! Client configuration
//!
//! A YAML file can carry everything needed to run one query:
//!
//! ```yaml
//! endpoint: https://query.wikidata.org/sparql
//! query: |
//!   SELECT ?item WHERE { ?item wdt:P31 wd:Q146 } LIMIT 5
//! user_agent: my-tool/1.0
//! timeout_secs: 30
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid YAML for a [`ClientConfig`]
    #[error("Invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Settings for a [`SparqlClient`](crate::SparqlClient)
///
/// Missing agent or accept values fall back to
/// [`DEFAULT_AGENT`](crate::DEFAULT_AGENT) and
/// [`DEFAULT_ACCEPT`](crate::DEFAULT_ACCEPT).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Endpoint base URL
    pub endpoint: String,
    /// SPARQL query text
    pub query: String,
    /// Overrides the `User-Agent` header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Overrides the `Accept` header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,
    /// Request timeout applied by the default transport
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml() {
        let config = ClientConfig::from_yaml_str(
            "endpoint: http://example.com/sparql\n\
             query: SELECT * WHERE { ?s ?p ?o }\n\
             timeout_secs: 5\n",
        )
        .unwrap();
        assert_eq!(config.endpoint, "http://example.com/sparql");
        assert_eq!(config.query, "SELECT * WHERE { ?s ?p ?o }");
        assert_eq!(config.timeout_secs, Some(5));
        assert_eq!(config.user_agent, None);
        assert_eq!(config.accept, None);
    }

    #[test]
    fn test_from_yaml_all_fields_optional() {
        let config = ClientConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_from_yaml_rejects_bad_types() {
        let err = ClientConfig::from_yaml_str("timeout_secs: soon").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ClientConfig::from_yaml_file("/nonexistent/spargo.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
