use crate::{RemoteQueryError, ResultTermMode};
use oxrdfio::{RdfFormat, RdfParser};
use rdf_tabular_model::{Graph, OutputSchema, Row, Triple, Variable};
use sparesults::{QueryResultsFormat, QueryResultsParser, ReaderQueryResultsParserOutput};
use std::sync::Arc;
use tracing::warn;

/// The rows of a query result.
///
/// The response has been fully decoded when a [QueryRows] is returned, so iterating cannot
/// fail. The rows can only be iterated once.
#[derive(Debug)]
pub struct QueryRows {
    schema: OutputSchema,
    rows: std::vec::IntoIter<Row>,
}

impl QueryRows {
    /// Wraps already decoded `rows`. All rows are expected to have the columns of `schema`.
    pub fn new(schema: OutputSchema, rows: Vec<Row>) -> Self {
        Self {
            schema,
            rows: rows.into_iter(),
        }
    }

    /// The schema shared by all rows.
    pub fn schema(&self) -> &OutputSchema {
        &self.schema
    }
}

impl Iterator for QueryRows {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.rows.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for QueryRows {}

/// Decodes an RDF/XML document into one row per triple.
pub(crate) fn decode_graph(
    body: &[u8],
    schema: &OutputSchema,
    mode: ResultTermMode,
) -> Result<Vec<Row>, RemoteQueryError> {
    let mut graph = Graph::new();
    for quad in RdfParser::from_format(RdfFormat::RdfXml).for_reader(body) {
        graph.insert(&Triple::from(quad?));
    }

    let columns = schema.column_names();
    Ok(graph
        .iter()
        .map(|triple| {
            let triple = triple.into_owned();
            Row::new(
                Arc::clone(&columns),
                vec![
                    Some(mode.to_value(&triple.subject.into())),
                    Some(mode.to_value(&triple.predicate.into())),
                    Some(mode.to_value(&triple.object)),
                ],
            )
        })
        .collect())
}

/// Decodes SPARQL JSON results into one row per solution, aligned with `variables`.
pub(crate) fn decode_solutions(
    body: &[u8],
    schema: &OutputSchema,
    variables: &[Variable],
    mode: ResultTermMode,
) -> Result<Vec<Row>, RemoteQueryError> {
    let solutions = match QueryResultsParser::from_format(QueryResultsFormat::Json)
        .for_reader(body)?
    {
        ReaderQueryResultsParserOutput::Solutions(solutions) => solutions,
        ReaderQueryResultsParserOutput::Boolean(_) => {
            return Err(RemoteQueryError::UnexpectedBooleanResults)
        }
    };

    for variable in solutions.variables() {
        if !variables.contains(variable) {
            warn!("Ignoring variable {variable} that is not projected by the query");
        }
    }

    let columns = schema.column_names();
    solutions
        .map(|solution| -> Result<Row, RemoteQueryError> {
            let solution = solution?;
            let values = variables
                .iter()
                .map(|variable| solution.get(variable).map(|term| mode.to_value(term)))
                .collect();
            Ok(Row::new(Arc::clone(&columns), values))
        })
        .collect()
}
