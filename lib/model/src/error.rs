use oxrdf::TermParseError;
use std::io;

/// An error raised while decoding the canonical encoding of a term.
///
/// Decoding errors indicate corrupted data. Callers must propagate them instead of skipping the
/// affected value.
#[derive(Debug, thiserror::Error)]
#[error("Could not decode the term '{encoded}': {kind}")]
pub struct TermDecodingError {
    /// The text that failed to decode.
    encoded: String,
    /// Why the decoding failed.
    #[source]
    kind: TermDecodingErrorKind,
}

/// The reason of a [TermDecodingError].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TermDecodingErrorKind {
    /// The text is not a valid term.
    #[error(transparent)]
    Syntax(#[from] TermParseError),
    /// The text is a valid term but cannot be used at the given position of a triple.
    #[error("a {actual} cannot be used as the {position} of a triple")]
    InvalidPosition {
        /// The triple position.
        position: TriplePosition,
        /// The kind of term that has been found.
        actual: &'static str,
    },
}

/// The positions of a triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriplePosition {
    Subject,
    Predicate,
    Object,
}

impl std::fmt::Display for TriplePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TriplePosition::Subject => "subject",
            TriplePosition::Predicate => "predicate",
            TriplePosition::Object => "object",
        })
    }
}

impl TermDecodingError {
    pub(crate) fn new(encoded: impl Into<String>, kind: impl Into<TermDecodingErrorKind>) -> Self {
        Self {
            encoded: encoded.into(),
            kind: kind.into(),
        }
    }

    /// The text that failed to decode.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// The reason of the failure.
    pub fn kind(&self) -> &TermDecodingErrorKind {
        &self.kind
    }
}

impl From<TermDecodingError> for io::Error {
    #[inline]
    fn from(error: TermDecodingError) -> Self {
        Self::new(io::ErrorKind::InvalidData, error)
    }
}
