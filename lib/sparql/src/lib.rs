#![doc(test(attr(deny(warnings))))]

//! Query planning for [RDF Tabular](https://docs.rs/rdf-tabular/).
//!
//! A SPARQL query is parsed into a [QueryPlan] that knows its [QueryType]. From the plan, the
//! tabular [OutputSchema](rdf_tabular_model::OutputSchema) of its results is derived with
//! [infer_schema] and a row limit can be embedded with [with_limit].
//!
//! ```
//! use rdf_tabular_sparql::{infer_schema, parse_query, QueryType};
//!
//! let plan = parse_query("SELECT ?s ?o WHERE { ?s ?p ?o }")?;
//! assert!(matches!(plan.query_type(), QueryType::Select { .. }));
//! assert_eq!(infer_schema(&plan)?.column_names().as_ref(), ["s", "o"]);
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

mod error;
mod limit;
mod parser;
mod plan;
mod schema;

pub use error::{QueryPlanError, QuerySyntaxError, UnsupportedQueryTypeError};
pub use limit::with_limit;
pub use parser::{parse_query, QueryParser};
pub use plan::{classify, QueryPlan, QueryType, UnsupportedQueryForm};
pub use schema::{infer_schema, CONSTRUCT_COLUMNS};
pub use spargebra::Query;
