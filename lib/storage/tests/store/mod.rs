use crate::{ex, example_triple, mem_store, pattern_fixture};
use async_trait::async_trait;
use datafusion::arrow::array::{RecordBatch, StringArray};
use datafusion::arrow::datatypes::SchemaRef;
use datafusion::execution::SendableRecordBatchStream;
use futures::StreamExt;
use rdf_tabular_model::{GraphNameRef, Literal, Triple, TriplePattern};
use rdf_tabular_storage::error::{RefusedMutation, StorageError, TripleStoreError};
use rdf_tabular_storage::{
    DatasetTripleStore, MemDataset, TabularDataset, TripleStoreConfig, TripleStoreEvent,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

async fn matching(store: &DatasetTripleStore, pattern: TriplePattern) -> Vec<Triple> {
    store
        .triples(&pattern, None)
        .await
        .unwrap()
        .try_collect_to_vec()
        .await
        .unwrap()
}

async fn fixture_store() -> DatasetTripleStore {
    let (_, mut store) = mem_store(TripleStoreConfig::default().with_scan_batch_size(2)).await;
    for triple in pattern_fixture() {
        store.add(&triple, None).await.unwrap();
    }
    store.commit().await.unwrap();
    store
}

#[tokio::test]
async fn test_staged_triples_are_not_visible() {
    let (dataset, mut store) = mem_store(TripleStoreConfig::default()).await;
    let triple = example_triple("A", "p1", Literal::from(1));

    let committed = store.add(&triple, None).await.unwrap();
    assert!(!committed);
    assert_eq!(store.staged_len(), 1);
    assert_eq!(dataset.num_rows().await, 0);
    assert!(matching(&store, TriplePattern::any()).await.is_empty());
    assert_eq!(store.len().await.unwrap(), 0);
    assert!(store.is_empty().await.unwrap());

    assert_eq!(store.commit().await.unwrap(), 1);
    assert_eq!(store.staged_len(), 0);
    assert_eq!(matching(&store, TriplePattern::any()).await, [triple]);
    assert_eq!(store.len().await.unwrap(), 1);
    assert!(!store.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_commit_empty_buffer_is_noop() {
    let (dataset, mut store) = mem_store(TripleStoreConfig::default()).await;

    assert_eq!(store.commit().await.unwrap(), 0);
    assert!(dataset.batches().await.is_empty());
}

#[tokio::test]
async fn test_commit_writes_one_batch() {
    let (dataset, mut store) = mem_store(TripleStoreConfig::default()).await;
    for triple in pattern_fixture() {
        store.add(&triple, None).await.unwrap();
    }
    store.commit().await.unwrap();

    let batches = dataset.batches().await;
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].num_rows(), 3);
}

#[tokio::test]
async fn test_autocommit_at_threshold() {
    let (dataset, mut store) =
        mem_store(TripleStoreConfig::default().with_autocommit_threshold(3)).await;
    let triples = pattern_fixture();

    assert!(!store.add(&triples[0], None).await.unwrap());
    assert!(!store.add(&triples[1], None).await.unwrap());
    assert_eq!(dataset.num_rows().await, 0);

    assert!(store.add(&triples[2], None).await.unwrap());
    assert_eq!(dataset.num_rows().await, 3);
    assert_eq!(store.staged_len(), 0);

    assert!(!store.add(&triples[0], None).await.unwrap());
    assert_eq!(store.staged_len(), 1);
}

#[tokio::test]
async fn test_remove_and_destroy_fail_on_empty_store() {
    let (_, mut store) = mem_store(TripleStoreConfig::default()).await;
    let triple = example_triple("A", "p1", Literal::from(1));

    let error = store.remove(&triple, None).unwrap_err();
    assert_eq!(error.mutation(), RefusedMutation::Remove);
    let error = store.destroy().unwrap_err();
    assert_eq!(error.mutation(), RefusedMutation::Destroy);
}

#[tokio::test]
async fn test_remove_and_destroy_fail_on_populated_store() {
    let mut store = fixture_store().await;
    let triple = pattern_fixture().remove(0);

    assert!(store.remove(&triple, None).is_err());
    assert!(store.destroy().is_err());
    store.create();
    assert_eq!(store.len().await.unwrap(), 3);
}

#[tokio::test]
async fn test_match_subject() {
    let store = fixture_store().await;
    let fixture = pattern_fixture();

    let result = matching(&store, TriplePattern::any().with_subject(ex("A"))).await;
    assert_eq!(result, fixture[..2]);
}

#[tokio::test]
async fn test_match_predicate() {
    let store = fixture_store().await;
    let fixture = pattern_fixture();

    let result = matching(&store, TriplePattern::any().with_predicate(ex("p1"))).await;
    assert_eq!(result, [fixture[0].clone(), fixture[2].clone()]);
}

#[tokio::test]
async fn test_match_object() {
    let store = fixture_store().await;
    let fixture = pattern_fixture();

    let result = matching(&store, TriplePattern::any().with_object(Literal::from(2))).await;
    assert_eq!(result, [fixture[1].clone()]);
}

#[tokio::test]
async fn test_match_without_result() {
    let store = fixture_store().await;

    let pattern = TriplePattern::any()
        .with_subject(ex("B"))
        .with_predicate(ex("p2"));
    assert!(matching(&store, pattern).await.is_empty());
}

#[tokio::test]
async fn test_match_any_keeps_insertion_order() {
    let store = fixture_store().await;
    assert_eq!(matching(&store, TriplePattern::any()).await, pattern_fixture());
}

#[tokio::test]
async fn test_match_is_exact_on_literals() {
    let store = fixture_store().await;

    // "1" is a simple literal, the stored object is an xsd:integer.
    let pattern = TriplePattern::any().with_object(Literal::new_simple_literal("1"));
    assert!(matching(&store, pattern).await.is_empty());
}

#[tokio::test]
async fn test_context_is_ignored() {
    let (_, mut store) = mem_store(TripleStoreConfig::default()).await;
    let graph = ex("graph");
    let triple = example_triple("A", "p1", Literal::from(1));

    store
        .add(&triple, Some(GraphNameRef::NamedNode(graph.as_ref())))
        .await
        .unwrap();
    store.commit().await.unwrap();

    let result = store
        .triples(&TriplePattern::any(), Some(GraphNameRef::DefaultGraph))
        .await
        .unwrap()
        .try_collect_to_vec()
        .await
        .unwrap();
    assert_eq!(result, [triple]);
}

#[tokio::test]
async fn test_malformed_cell_fails_scan() {
    let (dataset, store) = mem_store(TripleStoreConfig::default()).await;
    let batch = RecordBatch::try_new(
        store.schema().to_arrow_schema(),
        vec![
            Arc::new(StringArray::from(vec!["<http://example.com/A>"])),
            Arc::new(StringArray::from(vec!["<http://example.com/p1>"])),
            Arc::new(StringArray::from(vec!["\"unterminated"])),
        ],
    )
    .unwrap();
    dataset.append(batch).await.unwrap();

    let mut stream = store.triples(&TriplePattern::any(), None).await.unwrap();
    assert!(matches!(
        stream.next().await,
        Some(Err(TripleStoreError::Decoding(_)))
    ));
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_observers_see_every_addition() {
    let (_, mut store) =
        mem_store(TripleStoreConfig::default().with_autocommit_threshold(2)).await;
    let events = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&events);
    store.subscribe(move |event: &TripleStoreEvent<'_>| {
        let description = match event {
            TripleStoreEvent::TripleAdded { triple, .. } => format!("added {triple}"),
            TripleStoreEvent::Committed { triples } => format!("committed {triples}"),
            _ => "unknown".to_owned(),
        };
        recorded.lock().unwrap().push(description);
    });

    for triple in pattern_fixture() {
        store.add(&triple, None).await.unwrap();
    }

    let events = events.lock().unwrap().clone();
    assert_eq!(
        events,
        [
            "added <http://example.com/A> <http://example.com/p1> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer>",
            "added <http://example.com/A> <http://example.com/p2> \"2\"^^<http://www.w3.org/2001/XMLSchema#integer>",
            "committed 2",
            "added <http://example.com/B> <http://example.com/p1> \"3\"^^<http://www.w3.org/2001/XMLSchema#integer>",
        ]
    );
}

/// A dataset whose next append fails once.
struct FailingDataset {
    inner: MemDataset,
    fail_next_append: AtomicBool,
}

#[async_trait]
impl TabularDataset for FailingDataset {
    async fn write_schema(&self, schema: SchemaRef) -> Result<(), StorageError> {
        self.inner.write_schema(schema).await
    }

    async fn schema(&self) -> Result<Option<SchemaRef>, StorageError> {
        self.inner.schema().await
    }

    async fn append(&self, batch: RecordBatch) -> Result<(), StorageError> {
        if self.fail_next_append.swap(false, Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other("disk full")));
        }
        self.inner.append(batch).await
    }

    async fn scan(
        &self,
        columns: &[&str],
        batch_size: usize,
    ) -> Result<SendableRecordBatchStream, StorageError> {
        self.inner.scan(columns, batch_size).await
    }
}

fn failing_dataset() -> Arc<FailingDataset> {
    Arc::new(FailingDataset {
        inner: MemDataset::new(),
        fail_next_append: AtomicBool::new(true),
    })
}

#[tokio::test]
async fn test_failed_commit_keeps_buffer() {
    let dataset = failing_dataset();
    let mut store = DatasetTripleStore::new(
        Arc::<FailingDataset>::clone(&dataset),
        TripleStoreConfig::default(),
    );
    store.write_schema().await.unwrap();
    for triple in pattern_fixture() {
        store.add(&triple, None).await.unwrap();
    }

    let error = store.commit().await.unwrap_err();
    assert!(matches!(error, TripleStoreError::Storage(StorageError::Io(_))));
    assert_eq!(store.staged_len(), 3);
    assert_eq!(dataset.inner.num_rows().await, 0);

    assert_eq!(store.commit().await.unwrap(), 3);
    assert_eq!(matching(&store, TriplePattern::any()).await, pattern_fixture());
}

#[tokio::test]
async fn test_failed_autocommit_keeps_triple_staged() {
    let dataset = failing_dataset();
    let mut store = DatasetTripleStore::new(
        Arc::<FailingDataset>::clone(&dataset),
        TripleStoreConfig::default().with_autocommit_threshold(1),
    );
    store.write_schema().await.unwrap();
    let triple = example_triple("A", "p1", Literal::from(1));

    assert!(store.add(&triple, None).await.is_err());
    assert_eq!(store.staged_len(), 1);
    assert_eq!(store.commit().await.unwrap(), 1);
}
