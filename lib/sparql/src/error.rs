use crate::plan::UnsupportedQueryForm;
use rdf_tabular_model::IriParseError;
use spargebra::SparqlSyntaxError;

/// An error raised while parsing a SPARQL query.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QuerySyntaxError {
    /// The query text is not valid SPARQL.
    #[error(transparent)]
    Syntax(#[from] SparqlSyntaxError),
    /// A prefix or base IRI given to the parser is not a valid IRI.
    #[error("Invalid IRI for the query parser: {0}")]
    InvalidIri(#[from] IriParseError),
}

/// Raised when a query form has no tabular representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{form} queries are not supported, only SELECT and CONSTRUCT queries are")]
pub struct UnsupportedQueryTypeError {
    form: UnsupportedQueryForm,
}

impl UnsupportedQueryTypeError {
    pub fn new(form: UnsupportedQueryForm) -> Self {
        Self { form }
    }

    /// The detected query form.
    pub fn form(&self) -> UnsupportedQueryForm {
        self.form
    }
}

/// An error raised while preparing a query for execution.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QueryPlanError {
    #[error(transparent)]
    Syntax(#[from] QuerySyntaxError),
    #[error(transparent)]
    UnsupportedQueryType(#[from] UnsupportedQueryTypeError),
}

impl From<SparqlSyntaxError> for QueryPlanError {
    #[inline]
    fn from(error: SparqlSyntaxError) -> Self {
        Self::Syntax(error.into())
    }
}
