use rdf_tabular_model::codec::{encode_term, lexical_value};
use rdf_tabular_model::{RowValue, Term};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// How the RDF terms of a result are rendered in rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResultTermMode {
    /// The lexical value as a string: the IRI, the literal value without language tag or
    /// datatype, or the blank node identifier.
    #[default]
    Raw,
    /// The canonical N-Triples encoding as a string, e.g. `<http://example.com/a>` or
    /// `"chat"@fr`.
    Canonical,
    /// The term itself.
    Term,
}

impl ResultTermMode {
    /// Renders `term` according to this mode.
    pub fn to_value(self, term: &Term) -> RowValue {
        match self {
            ResultTermMode::Raw => RowValue::String(lexical_value(term)),
            ResultTermMode::Canonical => RowValue::String(encode_term(term)),
            ResultTermMode::Term => RowValue::Term(term.clone()),
        }
    }
}

impl Display for ResultTermMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ResultTermMode::Raw => "raw",
            ResultTermMode::Canonical => "canonical",
            ResultTermMode::Term => "term",
        })
    }
}

impl FromStr for ResultTermMode {
    type Err = ParseResultTermModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "canonical" | "n3" => Ok(Self::Canonical),
            "term" => Ok(Self::Term),
            _ => Err(ParseResultTermModeError(value.to_owned())),
        }
    }
}

/// Raised when parsing an unknown [ResultTermMode] name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Unknown result term mode '{0}', expected one of raw, canonical or term")]
pub struct ParseResultTermModeError(String);
