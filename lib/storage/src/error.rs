use datafusion::arrow::error::ArrowError;
use datafusion::error::DataFusionError;
use rdf_tabular_model::TermDecodingError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

/// An error related to dataset operations (reads, writes, schema declarations).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StorageError {
    /// Error from the OS I/O layer.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Error while reading or writing CSV data.
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// Error while building or slicing Arrow data.
    #[error(transparent)]
    Arrow(#[from] ArrowError),
    /// Rows have been written before declaring a schema.
    #[error("The dataset has no schema. Declare the schema before writing rows.")]
    SchemaNotDeclared,
    /// The data does not fit the declared schema.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),
    /// The stored data is corrupted.
    #[error("Corrupted dataset: {0}")]
    Corruption(String),
    #[error("{0}")]
    Other(#[source] Box<dyn Error + Send + Sync + 'static>),
}

impl From<StorageError> for io::Error {
    #[inline]
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::Io(error) => error,
            StorageError::Corruption(_) | StorageError::SchemaMismatch(_) => {
                Self::new(io::ErrorKind::InvalidData, error)
            }
            _ => Self::other(error),
        }
    }
}

impl From<DataFusionError> for StorageError {
    #[inline]
    fn from(error: DataFusionError) -> Self {
        match error {
            DataFusionError::IoError(error) => Self::Io(error),
            DataFusionError::External(error) => match error.downcast::<StorageError>() {
                Ok(error) => *error,
                Err(error) => Self::Other(error),
            },
            error => Self::Other(Box::new(error)),
        }
    }
}

impl From<StorageError> for DataFusionError {
    #[inline]
    fn from(error: StorageError) -> Self {
        DataFusionError::External(Box::new(error))
    }
}

/// The mutations that an append-only store refuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefusedMutation {
    Remove,
    Destroy,
}

impl Display for RefusedMutation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RefusedMutation::Remove => "removing triples",
            RefusedMutation::Destroy => "destroying the store",
        })
    }
}

/// Raised when removing data from an append-only store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("The store is append only, {mutation} is not supported")]
pub struct ImmutableStoreError {
    mutation: RefusedMutation,
}

impl ImmutableStoreError {
    pub(crate) fn new(mutation: RefusedMutation) -> Self {
        Self { mutation }
    }

    /// The refused mutation.
    pub fn mutation(&self) -> RefusedMutation {
        self.mutation
    }
}

/// An error raised by a [DatasetTripleStore](crate::DatasetTripleStore).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TripleStoreError {
    /// The store is append only.
    #[error(transparent)]
    Immutable(#[from] ImmutableStoreError),
    /// A stored cell does not hold a valid term encoding.
    #[error(transparent)]
    Decoding(#[from] TermDecodingError),
    /// An error from the underlying dataset.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<DataFusionError> for TripleStoreError {
    #[inline]
    fn from(error: DataFusionError) -> Self {
        Self::Storage(error.into())
    }
}

impl From<ArrowError> for TripleStoreError {
    #[inline]
    fn from(error: ArrowError) -> Self {
        Self::Storage(error.into())
    }
}

impl From<TripleStoreError> for io::Error {
    #[inline]
    fn from(error: TripleStoreError) -> Self {
        match error {
            TripleStoreError::Immutable(error) => Self::new(io::ErrorKind::Unsupported, error),
            TripleStoreError::Decoding(error) => error.into(),
            TripleStoreError::Storage(error) => error.into(),
        }
    }
}
