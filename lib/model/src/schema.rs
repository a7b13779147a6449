use datafusion::arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// The type of a tabular column.
///
/// Every column produced by this workspace holds strings. The enum exists so that the schema
/// contract stays explicit at the API boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColumnType {
    #[default]
    String,
}

impl ColumnType {
    /// The Arrow [DataType] used for storing columns of this type.
    pub fn data_type(self) -> DataType {
        match self {
            ColumnType::String => DataType::Utf8,
        }
    }
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::String => f.write_str("string"),
        }
    }
}

/// Describes a single column of a tabular output.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColumnDescriptor {
    name: String,
    column_type: ColumnType,
}

impl ColumnDescriptor {
    /// Creates a new string column called `name`.
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::String,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }
}

/// The ordered list of columns of a tabular output.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OutputSchema {
    columns: Vec<ColumnDescriptor>,
}

impl OutputSchema {
    /// Creates a new [OutputSchema] from its columns.
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self { columns }
    }

    /// Creates the schema of a table holding triples, with one string column per position.
    pub fn triples(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self::new(vec![
            ColumnDescriptor::string(subject),
            ColumnDescriptor::string(predicate),
            ColumnDescriptor::string(object),
        ])
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the column names in order. Rows built against this schema share this list.
    pub fn column_names(&self) -> Arc<[String]> {
        self.columns
            .iter()
            .map(|column| column.name.clone())
            .collect()
    }

    /// Converts this schema into an Arrow schema. All columns are nullable.
    pub fn to_arrow_schema(&self) -> SchemaRef {
        let fields = self
            .columns
            .iter()
            .map(|column| Field::new(&column.name, column.column_type.data_type(), true))
            .collect::<Vec<_>>();
        Arc::new(Schema::new(fields))
    }
}

impl<'a> IntoIterator for &'a OutputSchema {
    type Item = &'a ColumnDescriptor;
    type IntoIter = std::slice::Iter<'a, ColumnDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
