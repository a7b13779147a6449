use oxrdfio::RdfParseError;
use rdf_tabular_sparql::{QueryPlanError, QuerySyntaxError, UnsupportedQueryTypeError};
use reqwest::StatusCode;
use sparesults::QueryResultsParseError;

/// The maximum number of characters of a response body kept in an [EndpointError].
pub(crate) const MAX_DETAIL_LENGTH: usize = 512;

/// A non-success response of a SPARQL endpoint.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("The SPARQL endpoint answered with status {status}: {detail}")]
pub struct EndpointError {
    status: StatusCode,
    detail: String,
}

impl EndpointError {
    /// Creates a new [EndpointError], keeping the beginning of the response `body`.
    pub fn new(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            detail: body.trim().chars().take(MAX_DETAIL_LENGTH).collect(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The beginning of the response body.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// An error raised while running a query against a remote endpoint.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RemoteQueryError {
    /// The query could not be prepared.
    #[error(transparent)]
    Plan(#[from] QueryPlanError),
    /// The query form has no tabular results.
    #[error(transparent)]
    UnsupportedQueryType(#[from] UnsupportedQueryTypeError),
    /// The endpoint answered with a non-success status.
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    /// The request could not be sent or the response could not be read.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    /// The SPARQL results returned for a SELECT query are invalid.
    #[error(transparent)]
    ResultsParsing(#[from] QueryResultsParseError),
    /// The RDF document returned for a CONSTRUCT query is invalid.
    #[error(transparent)]
    GraphParsing(#[from] RdfParseError),
    #[error("The SPARQL endpoint returned a boolean instead of solutions")]
    UnexpectedBooleanResults,
    #[error("Invalid SPARQL endpoint URL '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

impl From<QuerySyntaxError> for RemoteQueryError {
    #[inline]
    fn from(error: QuerySyntaxError) -> Self {
        Self::Plan(error.into())
    }
}
