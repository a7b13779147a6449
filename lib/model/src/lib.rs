//! The data model shared by the crates of [RDF Tabular](https://docs.rs/rdf-tabular/).
//!
//! RDF terms are the ones of [oxrdf], re-exported here. On top of them, this crate defines the
//! canonical string encoding used to store terms in tabular cells ([codec]), triple patterns for
//! scanning stored triples, and the [Row] type that every tabular output of the workspace uses.

pub mod codec;
mod error;
mod pattern;
mod row;
mod schema;

pub use error::*;
pub use pattern::TriplePattern;
pub use row::{Row, RowValue};
pub use schema::{ColumnDescriptor, ColumnType, OutputSchema};

// Re-export some oxrdf types.
pub use oxrdf::vocab;
pub use oxrdf::{
    BlankNode, BlankNodeRef, Graph, GraphName, GraphNameRef, IriParseError, Literal, LiteralRef,
    NamedNode, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, Quad, QuadRef, Subject,
    SubjectRef, Term, TermParseError, TermRef, Triple, TripleRef, Variable, VariableRef,
};
