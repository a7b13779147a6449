#![doc(test(attr(deny(warnings))))]

//! Contains the storage layer of [RDF Tabular](https://docs.rs/rdf-tabular/).
//!
//! The [DatasetTripleStore] uses a [TabularDataset] with three string columns as an append-only
//! storage for RDF triples. Triples are staged in memory, written in batches and read back with
//! chunked pattern scans.

pub mod dataset;
pub mod error;
mod store;

pub use dataset::{CsvDataset, MemDataset, TabularDataset};
pub use error::{ImmutableStoreError, RefusedMutation, StorageError, TripleStoreError};
pub use store::{
    DatasetTripleStore, TripleStoreConfig, TripleStoreEvent, TripleStoreObserver, TripleStream,
};
