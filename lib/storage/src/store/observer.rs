use rdf_tabular_model::{GraphNameRef, TripleRef};

/// An event emitted by a [DatasetTripleStore](crate::DatasetTripleStore).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum TripleStoreEvent<'a> {
    /// A triple has been staged.
    TripleAdded {
        triple: TripleRef<'a>,
        context: Option<GraphNameRef<'a>>,
    },
    /// The staging buffer has been written to the dataset.
    Committed { triples: usize },
}

/// Receives the events of a [DatasetTripleStore](crate::DatasetTripleStore).
///
/// Observers are called synchronously, in registration order, from the operation that caused
/// the event.
pub trait TripleStoreObserver: Send + Sync {
    fn on_event(&self, event: &TripleStoreEvent<'_>);
}

impl<F> TripleStoreObserver for F
where
    F: Fn(&TripleStoreEvent<'_>) + Send + Sync,
{
    fn on_event(&self, event: &TripleStoreEvent<'_>) {
        self(event);
    }
}
