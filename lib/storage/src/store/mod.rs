mod config;
mod observer;
mod stream;

pub use config::TripleStoreConfig;
pub use observer::{TripleStoreEvent, TripleStoreObserver};
pub use stream::TripleStream;

use crate::dataset::TabularDataset;
use crate::error::{ImmutableStoreError, RefusedMutation, TripleStoreError};
use datafusion::arrow::array::{ArrayRef, RecordBatch, StringArray};
use futures::TryStreamExt;
use rdf_tabular_model::codec::{encode_triple, EncodedTriple};
use rdf_tabular_model::{GraphNameRef, OutputSchema, TripleRef, TriplePattern};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// An append-only RDF triple store on top of a [TabularDataset].
///
/// Every triple is stored as one row of three string columns holding the
/// [canonical encoding](rdf_tabular_model::codec) of its terms. Added triples are staged in memory
/// and written to the dataset in a single batch by [DatasetTripleStore::commit]. A commit also
/// happens automatically once the number of staged triples reaches
/// [TripleStoreConfig::autocommit_threshold].
///
/// Staged triples are not visible to [DatasetTripleStore::triples] or [DatasetTripleStore::len]
/// until they are committed.
///
/// The store never removes or rewrites rows. Named graphs are not supported: the `context`
/// arguments are accepted for API compatibility and ignored.
///
/// ```
/// use rdf_tabular_model::{NamedNode, Literal, Triple, TriplePattern};
/// use rdf_tabular_storage::{DatasetTripleStore, MemDataset, TripleStoreConfig};
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let mut store =
///     DatasetTripleStore::new(Arc::new(MemDataset::new()), TripleStoreConfig::default());
/// store.write_schema().await?;
///
/// let triple = Triple::new(
///     NamedNode::new("http://example.com/book")?,
///     NamedNode::new("http://purl.org/dc/elements/1.1/title")?,
///     Literal::new_simple_literal("SPARQL Tutorial"),
/// );
/// store.add(&triple, None).await?;
/// store.commit().await?;
///
/// let triples = store
///     .triples(&TriplePattern::any(), None)
///     .await?
///     .try_collect_to_vec()
///     .await?;
/// assert_eq!(triples, [triple]);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// # }).unwrap();
/// ```
pub struct DatasetTripleStore {
    dataset: Arc<dyn TabularDataset>,
    config: TripleStoreConfig,
    staging: Vec<EncodedTriple>,
    observers: Vec<Box<dyn TripleStoreObserver>>,
}

impl DatasetTripleStore {
    /// Creates a new [DatasetTripleStore] writing to `dataset`.
    ///
    /// Call [DatasetTripleStore::write_schema] before adding triples to a new dataset.
    pub fn new(dataset: Arc<dyn TabularDataset>, config: TripleStoreConfig) -> Self {
        let staging = config
            .staging_capacity
            .map(Vec::with_capacity)
            .unwrap_or_default();
        Self {
            dataset,
            config,
            staging,
            observers: Vec::new(),
        }
    }

    pub fn config(&self) -> &TripleStoreConfig {
        &self.config
    }

    /// The dataset holding the committed triples.
    pub fn dataset(&self) -> &Arc<dyn TabularDataset> {
        &self.dataset
    }

    /// The schema of the rows written by this store.
    pub fn schema(&self) -> OutputSchema {
        self.config.output_schema()
    }

    /// Declares the three triple columns on the dataset.
    pub async fn write_schema(&self) -> Result<(), TripleStoreError> {
        self.dataset
            .write_schema(self.schema().to_arrow_schema())
            .await?;
        Ok(())
    }

    /// Does nothing. The dataset is expected to exist already.
    pub fn create(&self) {
        debug!("Ignoring create, the dataset is managed externally");
    }

    /// Registers an observer that receives all future events of this store.
    pub fn subscribe(&mut self, observer: impl TripleStoreObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Stages `triple` and commits the staging buffer if it reached the autocommit threshold.
    ///
    /// Returns whether a commit happened. If the commit fails, the triple stays staged.
    pub async fn add<'a>(
        &mut self,
        triple: impl Into<TripleRef<'a>>,
        context: Option<GraphNameRef<'a>>,
    ) -> Result<bool, TripleStoreError> {
        let triple = triple.into();
        self.staging.push(encode_triple(triple));
        trace!("Staged triple {triple}");
        self.notify(&TripleStoreEvent::TripleAdded { triple, context });

        if self.staging.len() < self.config.autocommit_threshold {
            return Ok(false);
        }

        self.commit().await?;
        Ok(true)
    }

    /// Writes all staged triples to the dataset as one batch.
    ///
    /// Returns the number of written triples. Committing an empty buffer does nothing. If the
    /// write fails, the staged triples are kept so that the commit can be retried.
    pub async fn commit(&mut self) -> Result<usize, TripleStoreError> {
        if self.staging.is_empty() {
            return Ok(0);
        }

        let batch = self.staged_batch()?;
        self.dataset.append(batch).await?;

        let count = self.staging.len();
        self.staging.clear();
        debug!("Committed {count} triples");
        self.notify(&TripleStoreEvent::Committed { triples: count });
        Ok(count)
    }

    /// Returns the committed triples matching `pattern`, in dataset order.
    ///
    /// The dataset is read in chunks of [TripleStoreConfig::scan_batch_size] rows. A stored cell
    /// that is not a valid term encoding fails the stream with [TripleStoreError::Decoding].
    pub async fn triples(
        &self,
        pattern: &TriplePattern,
        _context: Option<GraphNameRef<'_>>,
    ) -> Result<TripleStream, TripleStoreError> {
        let inner = self
            .dataset
            .scan(&self.config.column_names(), self.config.scan_batch_size)
            .await?;
        debug!("Scanning triples matching {pattern}");
        Ok(TripleStream::new(inner, pattern.encoded()))
    }

    /// Always fails, the store is append only.
    pub fn remove<'a>(
        &mut self,
        _triple: impl Into<TripleRef<'a>>,
        _context: Option<GraphNameRef<'a>>,
    ) -> Result<(), ImmutableStoreError> {
        Err(ImmutableStoreError::new(RefusedMutation::Remove))
    }

    /// Always fails, the store is append only.
    pub fn destroy(&mut self) -> Result<(), ImmutableStoreError> {
        Err(ImmutableStoreError::new(RefusedMutation::Destroy))
    }

    /// Counts the committed triples.
    ///
    /// This is a full scan of the dataset and is therefore O(n). Staged triples are not counted.
    pub async fn len(&self) -> Result<usize, TripleStoreError> {
        let mut stream = self
            .dataset
            .scan(&[self.config.subject_column.as_str()], self.config.scan_batch_size)
            .await?;
        let mut count = 0;
        while let Some(batch) = stream.try_next().await? {
            count += batch.num_rows();
        }
        Ok(count)
    }

    /// Returns true if no triple has been committed. Stops at the first non-empty chunk.
    pub async fn is_empty(&self) -> Result<bool, TripleStoreError> {
        let mut stream = self
            .dataset
            .scan(&[self.config.subject_column.as_str()], self.config.scan_batch_size)
            .await?;
        while let Some(batch) = stream.try_next().await? {
            if batch.num_rows() > 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The number of staged triples waiting for a commit.
    pub fn staged_len(&self) -> usize {
        self.staging.len()
    }

    fn staged_batch(&self) -> Result<RecordBatch, TripleStoreError> {
        let columns = vec![
            string_array(self.staging.iter().map(|t| t.subject.as_str())),
            string_array(self.staging.iter().map(|t| t.predicate.as_str())),
            string_array(self.staging.iter().map(|t| t.object.as_str())),
        ];
        Ok(RecordBatch::try_new(
            self.schema().to_arrow_schema(),
            columns,
        )?)
    }

    fn notify(&self, event: &TripleStoreEvent<'_>) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}

impl Drop for DatasetTripleStore {
    fn drop(&mut self) {
        if !self.staging.is_empty() {
            warn!(
                "Dropping a triple store with {} uncommitted triples",
                self.staging.len()
            );
        }
    }
}

fn string_array<'a>(values: impl Iterator<Item = &'a str>) -> ArrayRef {
    Arc::new(StringArray::from_iter_values(values))
}
