use crate::codec::encode_term;
use oxrdf::Term;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// The value of a single cell in a [Row].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RowValue {
    /// A plain string.
    String(String),
    /// A decoded RDF term.
    Term(Term),
}

impl RowValue {
    /// Returns the string if this is a [RowValue::String].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RowValue::String(value) => Some(value),
            RowValue::Term(_) => None,
        }
    }

    /// Returns the term if this is a [RowValue::Term].
    pub fn as_term(&self) -> Option<&Term> {
        match self {
            RowValue::String(_) => None,
            RowValue::Term(term) => Some(term),
        }
    }

    /// Renders the value as a string cell. Terms are rendered with their canonical encoding.
    pub fn to_cell(&self) -> String {
        match self {
            RowValue::String(value) => value.clone(),
            RowValue::Term(term) => encode_term(term),
        }
    }
}

impl Display for RowValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RowValue::String(value) => f.write_str(value),
            RowValue::Term(term) => write!(f, "{term}"),
        }
    }
}

impl From<String> for RowValue {
    fn from(value: String) -> Self {
        RowValue::String(value)
    }
}

impl From<&str> for RowValue {
    fn from(value: &str) -> Self {
        RowValue::String(value.to_owned())
    }
}

impl From<Term> for RowValue {
    fn from(value: Term) -> Self {
        RowValue::Term(value)
    }
}

/// A tabular row.
///
/// A row is an ordered list of (column name, value) pairs. The column names are shared between
/// all the rows of an output and are derived once from its [OutputSchema](crate::OutputSchema).
/// Cells can be empty, for example, if a variable is unbound in a SPARQL solution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Option<RowValue>>,
}

impl Row {
    /// Creates a new [Row].
    ///
    /// Missing trailing values are filled with empty cells and surplus values are dropped, such
    /// that the row always matches `columns`.
    pub fn new(columns: Arc<[String]>, mut values: Vec<Option<RowValue>>) -> Self {
        values.resize(columns.len(), None);
        Self { columns, values }
    }

    /// The column names of this row.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The cells of this row, in column order.
    pub fn values(&self) -> &[Option<RowValue>] {
        &self.values
    }

    /// Returns the value of the column called `name`.
    ///
    /// Returns `None` if the column does not exist or if the cell is empty.
    pub fn get(&self, name: &str) -> Option<&RowValue> {
        let index = self.columns.iter().position(|column| column == name)?;
        self.values.get(index)?.as_ref()
    }

    /// Iterates over the (column name, value) pairs of this row.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&RowValue>)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(Option::as_ref))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consumes the row and returns its values.
    pub fn into_values(self) -> Vec<Option<RowValue>> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::NamedNode;

    fn columns() -> Arc<[String]> {
        Arc::from(vec!["book".to_owned(), "title".to_owned()])
    }

    #[test]
    fn get_by_name() {
        let row = Row::new(
            columns(),
            vec![
                Some(RowValue::from("http://example.org/book/book6")),
                None,
            ],
        );

        assert_eq!(
            row.get("book").and_then(RowValue::as_str),
            Some("http://example.org/book/book6")
        );
        assert_eq!(row.get("title"), None);
        assert_eq!(row.get("author"), None);
    }

    #[test]
    fn new_pads_missing_values() {
        let row = Row::new(columns(), vec![]);
        assert_eq!(row.len(), 2);
        assert!(row.values().iter().all(Option::is_none));
    }

    #[test]
    fn term_cells_use_canonical_encoding() {
        let value = RowValue::from(Term::from(NamedNode::new_unchecked("http://e.com/a")));
        assert_eq!(value.to_cell(), "<http://e.com/a>");
        assert_eq!(value.as_str(), None);
    }

    #[test]
    fn iter_pairs_columns_and_values() {
        let row = Row::new(columns(), vec![Some("a".into()), Some("b".into())]);
        let pairs = row
            .iter()
            .map(|(name, value)| (name, value.map(RowValue::to_cell)))
            .collect::<Vec<_>>();
        assert_eq!(
            pairs,
            [
                ("book", Some("a".to_owned())),
                ("title", Some("b".to_owned()))
            ]
        );
    }
}
