use rdf_tabular_model::OutputSchema;
use serde::Deserialize;

/// The configuration of a [DatasetTripleStore](crate::DatasetTripleStore).
///
/// Missing fields take their default value when deserializing.
///
/// ```
/// use rdf_tabular_storage::TripleStoreConfig;
///
/// let config = TripleStoreConfig::default()
///     .with_columns("s", "p", "o")
///     .with_autocommit_threshold(100);
/// assert_eq!(config.subject_column, "s");
/// assert_eq!(config.scan_batch_size, 8192);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TripleStoreConfig {
    /// The column holding the encoded subjects.
    pub subject_column: String,
    /// The column holding the encoded predicates.
    pub predicate_column: String,
    /// The column holding the encoded objects.
    pub object_column: String,
    /// The number of staged triples that triggers a commit. A threshold of zero commits on
    /// every addition.
    pub autocommit_threshold: usize,
    /// The initial capacity of the staging buffer.
    pub staging_capacity: Option<usize>,
    /// The maximum number of rows read from the dataset at once.
    pub scan_batch_size: usize,
}

impl Default for TripleStoreConfig {
    fn default() -> Self {
        Self {
            subject_column: "subject".to_owned(),
            predicate_column: "predicate".to_owned(),
            object_column: "object".to_owned(),
            autocommit_threshold: 5000,
            staging_capacity: None,
            scan_batch_size: 8192,
        }
    }
}

impl TripleStoreConfig {
    #[must_use]
    pub fn with_columns(
        mut self,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        self.subject_column = subject.into();
        self.predicate_column = predicate.into();
        self.object_column = object.into();
        self
    }

    #[must_use]
    pub fn with_autocommit_threshold(mut self, threshold: usize) -> Self {
        self.autocommit_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_staging_capacity(mut self, capacity: usize) -> Self {
        self.staging_capacity = Some(capacity);
        self
    }

    #[must_use]
    pub fn with_scan_batch_size(mut self, batch_size: usize) -> Self {
        self.scan_batch_size = batch_size;
        self
    }

    /// The schema of the dataset holding the triples.
    pub fn output_schema(&self) -> OutputSchema {
        OutputSchema::triples(
            self.subject_column.as_str(),
            self.predicate_column.as_str(),
            self.object_column.as_str(),
        )
    }

    pub(crate) fn column_names(&self) -> [&str; 3] {
        [
            self.subject_column.as_str(),
            self.predicate_column.as_str(),
            self.object_column.as_str(),
        ]
    }
}
