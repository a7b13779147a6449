//! Tabular datasets that can hold the rows of a triple store.
//!
//! A [TabularDataset] is an external, append-only table. The triple store only relies on the
//! operations of this trait, so any storage that can declare a schema, append record batches and
//! scan its rows sequentially can be used.

mod csv_file;
mod memory;

pub use csv_file::CsvDataset;
pub use memory::MemDataset;

use crate::error::StorageError;
use async_trait::async_trait;
use datafusion::arrow::array::RecordBatch;
use datafusion::arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use datafusion::execution::SendableRecordBatchStream;
use std::sync::Arc;

/// An append-only table of string columns.
///
/// # Consistency
///
/// A scan returns the rows that have been appended before the scan started. Rows appended while
/// a scan is running may or may not be visible to it.
#[async_trait]
pub trait TabularDataset: Send + Sync {
    /// Declares the columns of the dataset.
    ///
    /// Declaring the same schema again has no effect. Declaring a different schema fails if the
    /// dataset already holds rows.
    async fn write_schema(&self, schema: SchemaRef) -> Result<(), StorageError>;

    /// Returns the declared schema, or `None` if no schema has been declared.
    async fn schema(&self) -> Result<Option<SchemaRef>, StorageError>;

    /// Appends all rows of `batch` at the end of the dataset.
    ///
    /// The columns of `batch` must match the declared schema.
    async fn append(&self, batch: RecordBatch) -> Result<(), StorageError>;

    /// Scans the dataset in insertion order.
    ///
    /// The returned stream only contains the given `columns` (in that order) and emits batches
    /// of at most `batch_size` rows. A dataset without a schema is scanned as an empty dataset.
    async fn scan(
        &self,
        columns: &[&str],
        batch_size: usize,
    ) -> Result<SendableRecordBatchStream, StorageError>;
}

/// Creates a schema with a nullable string column for each of the `columns`.
pub fn string_schema(columns: &[&str]) -> SchemaRef {
    let fields = columns
        .iter()
        .map(|name| Field::new(*name, DataType::Utf8, true))
        .collect::<Vec<_>>();
    Arc::new(Schema::new(fields))
}

/// Checks that `actual` has the same column names and types as `expected`.
fn ensure_same_columns(expected: &Schema, actual: &Schema) -> Result<(), StorageError> {
    let same_columns = expected.fields().len() == actual.fields().len()
        && expected
            .fields()
            .iter()
            .zip(actual.fields().iter())
            .all(|(e, a)| e.name() == a.name() && e.data_type() == a.data_type());

    if same_columns {
        Ok(())
    } else {
        Err(StorageError::SchemaMismatch(format!(
            "expected columns [{}], got [{}]",
            describe_columns(expected),
            describe_columns(actual)
        )))
    }
}

fn describe_columns(schema: &Schema) -> String {
    schema
        .fields()
        .iter()
        .map(|f| format!("{}: {}", f.name(), f.data_type()))
        .collect::<Vec<_>>()
        .join(", ")
}
