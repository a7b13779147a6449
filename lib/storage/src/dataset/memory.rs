use crate::dataset::{ensure_same_columns, string_schema, TabularDataset};
use crate::error::StorageError;
use async_trait::async_trait;
use datafusion::arrow::array::RecordBatch;
use datafusion::arrow::datatypes::SchemaRef;
use datafusion::error::DataFusionError;
use datafusion::execution::SendableRecordBatchStream;
use datafusion::physical_plan::stream::RecordBatchStreamAdapter;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// A [TabularDataset] that keeps its rows in memory as Arrow record batches.
///
/// Appended batches are never modified. A scan works on a snapshot of the batch list, so it is
/// not affected by concurrent appends.
#[derive(Debug, Default)]
pub struct MemDataset {
    state: RwLock<MemDatasetState>,
}

#[derive(Debug, Default)]
struct MemDatasetState {
    schema: Option<SchemaRef>,
    batches: Vec<RecordBatch>,
}

impl MemDatasetState {
    fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }
}

impl MemDataset {
    /// Creates a new empty [MemDataset] without a schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of rows in the dataset.
    pub async fn num_rows(&self) -> usize {
        self.state.read().await.num_rows()
    }

    /// Returns all the rows of the dataset as a list of batches, in insertion order.
    pub async fn batches(&self) -> Vec<RecordBatch> {
        self.state.read().await.batches.clone()
    }
}

#[async_trait]
impl TabularDataset for MemDataset {
    async fn write_schema(&self, schema: SchemaRef) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        if let Some(existing) = &state.schema {
            if ensure_same_columns(existing, &schema).is_ok() {
                return Ok(());
            }
            if state.num_rows() > 0 {
                return ensure_same_columns(existing, &schema);
            }
        }

        debug!("Declaring schema with {} columns", schema.fields().len());
        state.schema = Some(schema);
        Ok(())
    }

    async fn schema(&self) -> Result<Option<SchemaRef>, StorageError> {
        Ok(self.state.read().await.schema.clone())
    }

    async fn append(&self, batch: RecordBatch) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        let schema = state
            .schema
            .clone()
            .ok_or(StorageError::SchemaNotDeclared)?;
        ensure_same_columns(&schema, &batch.schema())?;

        // Store the batch with the declared schema such that field metadata is consistent.
        let batch = RecordBatch::try_new(schema, batch.columns().to_vec())?;
        state.batches.push(batch);
        Ok(())
    }

    async fn scan(
        &self,
        columns: &[&str],
        batch_size: usize,
    ) -> Result<SendableRecordBatchStream, StorageError> {
        let batch_size = batch_size.max(1);
        let state = self.state.read().await;

        let (projection, batches) = match &state.schema {
            None => (Vec::new(), Vec::new()),
            Some(schema) => {
                let projection = columns
                    .iter()
                    .map(|column| schema.index_of(column))
                    .collect::<Result<Vec<_>, _>>()?;
                (projection, state.batches.clone())
            }
        };
        drop(state);

        let output_schema = string_schema(columns);
        let chunks = batches.into_iter().flat_map(move |batch| {
            let projection = projection.clone();
            let output_schema = Arc::clone(&output_schema);
            (0..batch.num_rows())
                .step_by(batch_size)
                .map(move |offset| {
                    let length = batch_size.min(batch.num_rows() - offset);
                    let chunk = batch.slice(offset, length).project(&projection)?;
                    RecordBatch::try_new(Arc::clone(&output_schema), chunk.columns().to_vec())
                        .map_err(DataFusionError::from)
                })
        });

        Ok(Box::pin(RecordBatchStreamAdapter::new(
            string_schema(columns),
            futures::stream::iter(chunks),
        )))
    }
}
