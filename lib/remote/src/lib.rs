#![doc(test(attr(deny(warnings))))]

//! Runs SPARQL queries against remote endpoints and returns their results as tabular rows.
//!
//! The [RemoteQueryExecutor] supports SELECT queries, whose rows hold the bound variables, and
//! CONSTRUCT queries, whose rows hold the `subject`, `predicate` and `object` of each
//! constructed triple. How the values are rendered is controlled by the [ResultTermMode].

mod error;
mod executor;
mod mode;
mod rows;

pub use error::{EndpointError, RemoteQueryError};
pub use executor::{RemoteQueryExecutor, RemoteQueryOptions, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use mode::{ParseResultTermModeError, ResultTermMode};
pub use rows::QueryRows;
