use crate::error::{StorageError, TripleStoreError};
use datafusion::arrow::array::{Array, AsArray, BooleanArray, RecordBatch, StringArray};
use datafusion::arrow::compute::kernels::cmp::eq;
use datafusion::arrow::compute::{and, filter_record_batch};
use datafusion::arrow::error::ArrowError;
use datafusion::execution::SendableRecordBatchStream;
use futures::{Stream, StreamExt, TryStreamExt};
use rdf_tabular_model::codec::decode_triple;
use rdf_tabular_model::Triple;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tracing::trace;

/// A stream over the triples of a [DatasetTripleStore](crate::DatasetTripleStore) that match a
/// pattern.
///
/// Triples are emitted in the order of the dataset scan. The stream ends after the first error.
pub struct TripleStream {
    inner: Option<SendableRecordBatchStream>,
    /// Canonical encodings of the bound pattern positions.
    pattern: [Option<String>; 3],
    buffered: VecDeque<Result<Triple, TripleStoreError>>,
}

impl TripleStream {
    /// Creates a new [TripleStream] over a scan of the subject, predicate and object columns
    /// (in that order).
    pub(crate) fn new(inner: SendableRecordBatchStream, pattern: [Option<String>; 3]) -> Self {
        Self {
            inner: Some(inner),
            pattern,
            buffered: VecDeque::new(),
        }
    }

    /// Collects all the remaining triples.
    pub async fn try_collect_to_vec(self) -> Result<Vec<Triple>, TripleStoreError> {
        self.try_collect().await
    }

    fn poll_inner(
        &mut self,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Triple, TripleStoreError>>> {
        loop {
            if let Some(result) = self.buffered.pop_front() {
                if result.is_err() {
                    self.close();
                }
                return Poll::Ready(Some(result));
            }

            let Some(inner) = &mut self.inner else {
                return Poll::Ready(None);
            };

            match ready!(inner.poll_next_unpin(cx)) {
                None => {
                    self.close();
                    return Poll::Ready(None);
                }
                Some(Err(error)) => {
                    self.close();
                    return Poll::Ready(Some(Err(error.into())));
                }
                Some(Ok(batch)) => {
                    if let Err(error) = self.buffer_matches(&batch) {
                        self.buffered.push_back(Err(error));
                    }
                }
            }
        }
    }

    /// Filters `batch` by the pattern and buffers the decoded triples of the remaining rows.
    fn buffer_matches(&mut self, batch: &RecordBatch) -> Result<(), TripleStoreError> {
        let matching = match match_mask(batch, &self.pattern)? {
            Some(mask) => filter_record_batch(batch, &mask)?,
            None => batch.clone(),
        };
        trace!(
            "Scanned {} rows, {} match the pattern",
            batch.num_rows(),
            matching.num_rows()
        );

        let subjects = string_column(&matching, 0)?;
        let predicates = string_column(&matching, 1)?;
        let objects = string_column(&matching, 2)?;
        for row in 0..matching.num_rows() {
            if subjects.is_null(row) || predicates.is_null(row) || objects.is_null(row) {
                return Err(StorageError::Corruption(
                    "a stored triple has an empty cell".to_owned(),
                )
                .into());
            }

            let triple = decode_triple(
                subjects.value(row),
                predicates.value(row),
                objects.value(row),
            )?;
            self.buffered.push_back(Ok(triple));
        }
        Ok(())
    }

    fn close(&mut self) {
        self.inner = None;
        self.buffered.clear();
    }
}

impl Stream for TripleStream {
    type Item = Result<Triple, TripleStoreError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.poll_inner(cx)
    }
}

/// Computes which rows of `batch` match the bound positions of `pattern`.
///
/// Returns `None` if no position is bound.
fn match_mask(
    batch: &RecordBatch,
    pattern: &[Option<String>; 3],
) -> Result<Option<BooleanArray>, ArrowError> {
    let mut mask: Option<BooleanArray> = None;
    for (index, value) in pattern.iter().enumerate() {
        let Some(value) = value else {
            continue;
        };

        let matches = eq(batch.column(index), &StringArray::new_scalar(value.as_str()))?;
        mask = Some(match mask {
            None => matches,
            Some(mask) => and(&mask, &matches)?,
        });
    }
    Ok(mask)
}

fn string_column(batch: &RecordBatch, index: usize) -> Result<&StringArray, StorageError> {
    batch
        .column(index)
        .as_string_opt::<i32>()
        .ok_or_else(|| {
            StorageError::SchemaMismatch(format!(
                "expected a string column at position {index}, got {}",
                batch.column(index).data_type()
            ))
        })
}
