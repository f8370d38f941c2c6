//! Error types for spargo

use thiserror::Error;

/// Boxed error returned by a [`Transport`](crate::transport::Transport).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while executing a SPARQL query
#[derive(Error, Debug)]
pub enum SparqlError {
    /// The request could not be built, sent or received
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The endpoint answered with a status other than 200
    #[error("unexpected response from server: {status}")]
    Response { status: u16 },

    /// The body is not a SPARQL JSON results document
    #[error("failed to decode SPARQL results: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SparqlError {
    /// Wrap any transport-level failure.
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        SparqlError::Transport(err.into())
    }

    /// HTTP status code carried by a [`SparqlError::Response`].
    pub fn status(&self) -> Option<u16> {
        match self {
            SparqlError::Response { status } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, SparqlError::Transport(_))
    }

    pub fn is_response(&self) -> bool {
        matches!(self, SparqlError::Response { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, SparqlError::Decode(_))
    }
}

pub type SparqlResult<T> = Result<T, SparqlError>;
