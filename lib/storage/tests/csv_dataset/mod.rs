use crate::{example_triple, pattern_fixture};
use rdf_tabular_model::{BlankNode, Literal, TriplePattern};
use rdf_tabular_storage::error::StorageError;
use rdf_tabular_storage::{CsvDataset, DatasetTripleStore, TabularDataset, TripleStoreConfig};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

async fn csv_store(path: &Path, config: TripleStoreConfig) -> DatasetTripleStore {
    let dataset: Arc<dyn TabularDataset> = Arc::new(CsvDataset::new(path));
    let store = DatasetTripleStore::new(dataset, config);
    store.write_schema().await.unwrap();
    store
}

#[tokio::test]
async fn test_csv_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("triples.csv");

    let mut store = csv_store(&path, TripleStoreConfig::default()).await;
    for triple in pattern_fixture() {
        store.add(&triple, None).await.unwrap();
    }
    store.commit().await.unwrap();
    drop(store);

    let store = csv_store(&path, TripleStoreConfig::default().with_scan_batch_size(1)).await;
    let triples = store
        .triples(&TriplePattern::any(), None)
        .await
        .unwrap()
        .try_collect_to_vec()
        .await
        .unwrap();
    assert_eq!(triples, pattern_fixture());
    assert_eq!(store.len().await.unwrap(), 3);
}

#[tokio::test]
async fn test_csv_store_uses_configured_columns() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("triples.csv");

    let mut store = csv_store(
        &path,
        TripleStoreConfig::default().with_columns("s", "p", "o"),
    )
    .await;
    store
        .add(
            &example_triple(
                "A",
                "p1",
                Literal::new_language_tagged_literal_unchecked("a, b", "en"),
            ),
            None,
        )
        .await
        .unwrap();
    store.commit().await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("s,p,o"));
    assert_eq!(
        lines.next(),
        Some(r#"<http://example.com/A>,<http://example.com/p1>,"""a, b""@en""#)
    );
}

#[tokio::test]
async fn test_csv_store_keeps_blank_node_labels() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("triples.csv");
    let triple = rdf_tabular_model::Triple::new(
        BlankNode::new_unchecked("b1"),
        crate::ex("p"),
        BlankNode::new_unchecked("b2"),
    );

    let mut store = csv_store(&path, TripleStoreConfig::default()).await;
    store.add(&triple, None).await.unwrap();
    store.commit().await.unwrap();

    let pattern = TriplePattern::any().with_subject(BlankNode::new_unchecked("b1"));
    let triples = store
        .triples(&pattern, None)
        .await
        .unwrap()
        .try_collect_to_vec()
        .await
        .unwrap();
    assert_eq!(triples, [triple]);
}

#[tokio::test]
async fn test_csv_store_rejects_other_columns() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("triples.csv");

    let mut store = csv_store(&path, TripleStoreConfig::default()).await;
    store.add(&pattern_fixture()[0], None).await.unwrap();
    store.commit().await.unwrap();

    let dataset: Arc<dyn TabularDataset> = Arc::new(CsvDataset::new(&path));
    let other = DatasetTripleStore::new(
        dataset,
        TripleStoreConfig::default().with_columns("s", "p", "o"),
    );
    let error = other.write_schema().await.unwrap_err();
    assert!(matches!(
        error,
        rdf_tabular_storage::error::TripleStoreError::Storage(StorageError::SchemaMismatch(_))
    ));
}
