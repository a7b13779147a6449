use crate::plan::{QueryPlan, QueryType};
use crate::UnsupportedQueryTypeError;
use rdf_tabular_model::{ColumnDescriptor, OutputSchema};

/// The columns of the rows produced by a CONSTRUCT query.
pub const CONSTRUCT_COLUMNS: [&str; 3] = ["subject", "predicate", "object"];

/// Derives the tabular schema of the results of `plan`.
///
/// SELECT queries have one string column per projected variable, named like the variable and in
/// declaration order. CONSTRUCT queries always have the [CONSTRUCT_COLUMNS], whatever their
/// template.
pub fn infer_schema(plan: &QueryPlan) -> Result<OutputSchema, UnsupportedQueryTypeError> {
    match plan.query_type() {
        QueryType::Select { variables } => Ok(OutputSchema::new(
            variables
                .iter()
                .map(|variable| ColumnDescriptor::string(variable.as_str()))
                .collect(),
        )),
        QueryType::Construct => {
            let [subject, predicate, object] = CONSTRUCT_COLUMNS;
            Ok(OutputSchema::triples(subject, predicate, object))
        }
        QueryType::Unsupported(form) => Err(UnsupportedQueryTypeError::new(*form)),
    }
}
