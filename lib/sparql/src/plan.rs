use crate::parser::parse_query;
use crate::QuerySyntaxError;
use rdf_tabular_model::Variable;
use spargebra::algebra::GraphPattern;
use spargebra::Query;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The query forms without a tabular representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnsupportedQueryForm {
    Ask,
    Describe,
}

impl Display for UnsupportedQueryForm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            UnsupportedQueryForm::Ask => "ASK",
            UnsupportedQueryForm::Describe => "DESCRIBE",
        })
    }
}

/// The kind of a query, as far as tabular results are concerned.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QueryType {
    /// A SELECT query projecting the given variables, in declaration order.
    Select { variables: Vec<Variable> },
    /// A CONSTRUCT query. Its results are triples.
    Construct,
    /// Any other query form.
    Unsupported(UnsupportedQueryForm),
}

impl QueryType {
    pub fn is_select(&self) -> bool {
        matches!(self, QueryType::Select { .. })
    }

    pub fn is_construct(&self) -> bool {
        matches!(self, QueryType::Construct)
    }
}

impl Display for QueryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryType::Select { .. } => f.write_str("SELECT"),
            QueryType::Construct => f.write_str("CONSTRUCT"),
            QueryType::Unsupported(form) => write!(f, "{form}"),
        }
    }
}

/// A parsed SPARQL query together with its [QueryType].
///
/// Plans are immutable. Operations such as [with_limit](crate::with_limit) derive new plans.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryPlan {
    query: Query,
    query_type: QueryType,
}

impl QueryPlan {
    /// Creates a new [QueryPlan] by classifying `query`.
    pub fn new(query: Query) -> Self {
        let query_type = classify_query(&query);
        Self { query, query_type }
    }

    /// The parsed query.
    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn query_type(&self) -> &QueryType {
        &self.query_type
    }

    pub fn into_query(self) -> Query {
        self.query
    }

    /// Serializes the plan into SPARQL query text.
    pub fn to_sparql(&self) -> String {
        self.query.to_string()
    }
}

impl From<Query> for QueryPlan {
    fn from(query: Query) -> Self {
        Self::new(query)
    }
}

impl FromStr for QueryPlan {
    type Err = QuerySyntaxError;

    fn from_str(query: &str) -> Result<Self, Self::Err> {
        parse_query(query)
    }
}

impl Display for QueryPlan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.query)
    }
}

/// Returns the [QueryType] of `plan`.
pub fn classify(plan: &QueryPlan) -> QueryType {
    plan.query_type.clone()
}

fn classify_query(query: &Query) -> QueryType {
    match query {
        Query::Select { pattern, .. } => QueryType::Select {
            variables: projected_variables(pattern),
        },
        Query::Construct { .. } => QueryType::Construct,
        Query::Ask { .. } => QueryType::Unsupported(UnsupportedQueryForm::Ask),
        Query::Describe { .. } => QueryType::Unsupported(UnsupportedQueryForm::Describe),
    }
}

/// Finds the projection below the solution modifiers.
fn projected_variables(pattern: &GraphPattern) -> Vec<Variable> {
    match pattern {
        GraphPattern::Slice { inner, .. }
        | GraphPattern::Distinct { inner }
        | GraphPattern::Reduced { inner } => projected_variables(inner),
        GraphPattern::Project { variables, .. } => variables.clone(),
        pattern => {
            let mut variables = Vec::new();
            pattern.on_in_scope_variable(|v| variables.push(v.clone()));
            variables
        }
    }
}
