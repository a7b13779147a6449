use oxrdfio::RdfParseError;
use rdf_tabular_model::{GraphName, IriParseError};
use rdf_tabular_storage::TripleStoreError;
use std::io;
use std::path::PathBuf;

/// An error raised while loading a file into a
/// [`DatasetTripleStore`](rdf_tabular_storage::DatasetTripleStore).
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// An error raised while reading the file.
    #[error(transparent)]
    Parsing(#[from] RdfParseError),
    /// An error raised during the insertion in the store.
    #[error(transparent)]
    Storage(#[from] TripleStoreError),
    /// The file contains a triple outside of the default graph.
    #[error("Only the default graph can be loaded, found a triple in graph {0}")]
    NamedGraph(GraphName),
    /// The base IRI is invalid.
    #[error("Invalid base IRI '{iri}': {error}")]
    InvalidBaseIri {
        /// The IRI itself.
        iri: String,
        /// The parsing error.
        #[source]
        error: IriParseError,
    },
}

impl From<LoaderError> for io::Error {
    #[inline]
    fn from(error: LoaderError) -> Self {
        match error {
            LoaderError::Storage(error) => error.into(),
            LoaderError::Parsing(error) => error.into(),
            LoaderError::NamedGraph(_) => Self::new(io::ErrorKind::InvalidData, error.to_string()),
            LoaderError::InvalidBaseIri { .. } => {
                Self::new(io::ErrorKind::InvalidInput, error.to_string())
            }
        }
    }
}

/// An error raised while writing a file from a
/// [`DatasetTripleStore`](rdf_tabular_storage::DatasetTripleStore).
#[derive(Debug, thiserror::Error)]
pub enum SerializerError {
    /// An error raised while writing the content.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// An error raised while scanning the triples of the store.
    #[error(transparent)]
    Storage(#[from] TripleStoreError),
}

impl From<SerializerError> for io::Error {
    #[inline]
    fn from(error: SerializerError) -> Self {
        match error {
            SerializerError::Io(error) => error,
            SerializerError::Storage(error) => error.into(),
        }
    }
}

/// An error raised when no RDF format matches a name or a file path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatGuessError {
    #[error("The file format '{0}' is unknown")]
    UnknownName(String),
    #[error("The file extension '{0}' is unknown")]
    UnknownExtension(String),
    #[error("The path {} has no extension to guess a file format from", .0.display())]
    MissingExtension(PathBuf),
}
