use crate::plan::QueryPlan;
use crate::QuerySyntaxError;
use oxiri::Iri;
use rdf_tabular_model::IriParseError;
use spargebra::Query;
use tracing::debug;

const DEFAULT_PREFIXES: [(&str, &str); 4] = [
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
];

/// Parses SPARQL queries into [QueryPlan]s.
///
/// The [default](QueryParser::default) parser knows the `rdf`, `rdfs`, `xsd` and `owl`
/// prefixes, so queries may use them without declaring them.
///
/// ```
/// use rdf_tabular_sparql::QueryParser;
///
/// let parser = QueryParser::new()
///     .with_prefix("ex", "http://example.com/")?
///     .with_base_iri("http://example.com/base/")?;
/// let plan = parser.parse("SELECT ?s WHERE { ?s ex:p <relative> }")?;
/// assert!(plan.to_sparql().contains("<http://example.com/base/relative>"));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone, Debug)]
pub struct QueryParser {
    prefixes: Vec<(String, String)>,
    base_iri: Option<String>,
}

impl QueryParser {
    /// Creates a parser without predeclared prefixes.
    pub fn empty() -> Self {
        Self {
            prefixes: Vec::new(),
            base_iri: None,
        }
    }

    /// Creates a parser with the `rdf`, `rdfs`, `xsd` and `owl` prefixes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a prefix available to all parsed queries.
    pub fn with_prefix(
        mut self,
        prefix_name: impl Into<String>,
        prefix_iri: impl Into<String>,
    ) -> Result<Self, IriParseError> {
        let prefix_iri = Iri::parse(prefix_iri.into())?.into_inner();
        self.prefixes.push((prefix_name.into(), prefix_iri));
        Ok(self)
    }

    /// Sets the base IRI used to resolve relative IRIs.
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Result<Self, IriParseError> {
        self.base_iri = Some(Iri::parse(base_iri.into())?.into_inner());
        Ok(self)
    }

    /// Parses and classifies `query`.
    ///
    /// The declared prefixes are prepended to the query as a `PREFIX` prologue, so a query can
    /// redeclare them.
    pub fn parse(&self, query: &str) -> Result<QueryPlan, QuerySyntaxError> {
        let query = Query::parse(&self.with_prologue(query), self.base_iri.as_deref())?;
        let plan = QueryPlan::new(query);
        debug!("Parsed {} query", plan.query_type());
        Ok(plan)
    }

    fn with_prologue(&self, query: &str) -> String {
        let mut text = self
            .prefixes
            .iter()
            .map(|(name, iri)| format!("PREFIX {name}: <{iri}>\n"))
            .collect::<String>();
        text.push_str(query);
        text
    }
}

impl Default for QueryParser {
    fn default() -> Self {
        Self {
            prefixes: DEFAULT_PREFIXES
                .iter()
                .map(|(name, iri)| ((*name).to_owned(), (*iri).to_owned()))
                .collect(),
            base_iri: None,
        }
    }
}

/// Parses `query` with the [default](QueryParser::default) parser.
pub fn parse_query(query: &str) -> Result<QueryPlan, QuerySyntaxError> {
    QueryParser::default().parse(query)
}
