use crate::dataset::{ensure_same_columns, string_schema, TabularDataset};
use crate::error::StorageError;
use async_trait::async_trait;
use datafusion::arrow::array::{
    Array, ArrayRef, AsArray, RecordBatch, RecordBatchOptions, StringBuilder,
};
use datafusion::arrow::datatypes::SchemaRef;
use datafusion::error::DataFusionError;
use datafusion::execution::SendableRecordBatchStream;
use datafusion::physical_plan::stream::RecordBatchStreamAdapter;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, trace};

type CsvReader = csv::Reader<File>;

/// A [TabularDataset] stored in a CSV file with a header row.
///
/// The header row holds the column names. Empty fields are read as null cells, and null cells
/// are written as empty fields. A missing or empty file is a dataset without a schema.
///
/// Writes through the same [CsvDataset] are serialized. Multiple [CsvDataset]s (or processes)
/// writing to the same file are not coordinated.
#[derive(Debug)]
pub struct CsvDataset {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvDataset {
    /// Creates a new [CsvDataset] backed by the file at `path`.
    ///
    /// The file is created when the schema is declared.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TabularDataset for CsvDataset {
    async fn write_schema(&self, schema: SchemaRef) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        run_blocking(move || {
            if let Some(header) = read_header(&path)? {
                if ensure_same_columns(&header.schema, &schema).is_ok() {
                    return Ok(());
                }
                if header.has_rows {
                    return ensure_same_columns(&header.schema, &schema);
                }
            }

            debug!("Writing CSV header to {}", path.display());
            let mut writer = csv::Writer::from_path(&path)?;
            writer.write_record(schema.fields().iter().map(|field| field.name().as_str()))?;
            writer.flush()?;
            Ok(())
        })
        .await
    }

    async fn schema(&self) -> Result<Option<SchemaRef>, StorageError> {
        let path = self.path.clone();
        run_blocking(move || Ok(read_header(&path)?.map(|header| header.schema))).await
    }

    async fn append(&self, batch: RecordBatch) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        run_blocking(move || {
            let header = read_header(&path)?.ok_or(StorageError::SchemaNotDeclared)?;
            ensure_same_columns(&header.schema, &batch.schema())?;

            // Serialize first such that a failing batch does not leave partial rows behind.
            let data = serialize_rows(&batch)?;
            OpenOptions::new()
                .append(true)
                .open(&path)?
                .write_all(&data)?;
            trace!("Appended {} rows to {}", batch.num_rows(), path.display());
            Ok(())
        })
        .await
    }

    async fn scan(
        &self,
        columns: &[&str],
        batch_size: usize,
    ) -> Result<SendableRecordBatchStream, StorageError> {
        let batch_size = batch_size.max(1);
        let schema = string_schema(columns);
        let path = self.path.clone();
        let requested = columns.iter().map(|c| (*c).to_owned()).collect::<Vec<_>>();

        let opened = run_blocking(move || open_for_scan(&path, &requested)).await?;
        let stream = futures::stream::try_unfold(opened, {
            let schema = Arc::clone(&schema);
            move |state| {
                let schema = Arc::clone(&schema);
                async move {
                    let Some((reader, projection)) = state else {
                        return Ok(None);
                    };
                    let (reader, batch) = run_blocking(move || {
                        read_chunk(reader, projection, &schema, batch_size)
                    })
                    .await
                    .map_err(DataFusionError::from)?;
                    Ok(batch.map(|batch| (batch, reader)))
                }
            }
        });

        Ok(Box::pin(RecordBatchStreamAdapter::new(schema, stream)))
    }
}

struct CsvHeader {
    schema: SchemaRef,
    has_rows: bool,
}

/// Reads the header row. Returns `None` if the file does not exist or is empty.
fn read_header(path: &Path) -> Result<Option<CsvHeader>, StorageError> {
    let Some(mut reader) = open_reader(path)? else {
        return Ok(None);
    };
    let names = reader.headers()?.clone();
    if names.is_empty() {
        return Ok(None);
    }

    let names = names.iter().collect::<Vec<_>>();
    let has_rows = reader.records().next().is_some();
    Ok(Some(CsvHeader {
        schema: string_schema(&names),
        has_rows,
    }))
}

fn open_reader(path: &Path) -> Result<Option<CsvReader>, StorageError> {
    match File::open(path) {
        Ok(file) => Ok(Some(
            csv::ReaderBuilder::new().has_headers(true).from_reader(file),
        )),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(error.into()),
    }
}

/// Opens the file and resolves the positions of the `requested` columns.
fn open_for_scan(
    path: &Path,
    requested: &[String],
) -> Result<Option<(CsvReader, Vec<usize>)>, StorageError> {
    let Some(mut reader) = open_reader(path)? else {
        return Ok(None);
    };
    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Ok(None);
    }

    let projection = requested
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|header| header == column)
                .ok_or_else(|| {
                    StorageError::SchemaMismatch(format!(
                        "column '{column}' does not exist in {}",
                        path.display()
                    ))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some((reader, projection)))
}

/// Reads up to `batch_size` records. The reader is handed back if more records may follow.
fn read_chunk(
    mut reader: CsvReader,
    projection: Vec<usize>,
    schema: &SchemaRef,
    batch_size: usize,
) -> Result<(Option<(CsvReader, Vec<usize>)>, Option<RecordBatch>), StorageError> {
    let mut builders = projection
        .iter()
        .map(|_| StringBuilder::new())
        .collect::<Vec<_>>();
    let mut record = csv::StringRecord::new();
    let mut rows = 0;
    while rows < batch_size && reader.read_record(&mut record)? {
        for (builder, index) in builders.iter_mut().zip(&projection) {
            match record.get(*index) {
                None | Some("") => builder.append_null(),
                Some(value) => builder.append_value(value),
            }
        }
        rows += 1;
    }

    if rows == 0 {
        return Ok((None, None));
    }

    let columns = builders
        .into_iter()
        .map(|mut builder| Arc::new(builder.finish()) as ArrayRef)
        .collect();
    let options = RecordBatchOptions::new().with_row_count(Some(rows));
    let batch = RecordBatch::try_new_with_options(Arc::clone(schema), columns, &options)?;
    let next = (rows == batch_size).then_some((reader, projection));
    Ok((next, Some(batch)))
}

fn serialize_rows(batch: &RecordBatch) -> Result<Vec<u8>, StorageError> {
    let columns = batch
        .columns()
        .iter()
        .map(|column| {
            column.as_string_opt::<i32>().ok_or_else(|| {
                StorageError::SchemaMismatch(format!(
                    "expected a string column, got {}",
                    column.data_type()
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    for row in 0..batch.num_rows() {
        writer.write_record(columns.iter().map(|column| {
            if column.is_null(row) {
                ""
            } else {
                column.value(row)
            }
        }))?;
    }
    writer
        .into_inner()
        .map_err(|error| StorageError::Io(error.into_error()))
}

async fn run_blocking<T: Send + 'static>(
    task: impl FnOnce() -> Result<T, StorageError> + Send + 'static,
) -> Result<T, StorageError> {
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|error| StorageError::Other(Box::new(error)))?
}
