use crate::codec::encode_term;
use oxrdf::Term;
use std::fmt::{Display, Formatter};

/// A triple pattern used for scanning stored triples.
///
/// Each position is either bound to a term or a wildcard (`None`). The predicate position accepts
/// any kind of term; patterns that bind it to something else than an IRI are valid but will not
/// match well-formed data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TriplePattern {
    pub subject: Option<Term>,
    pub predicate: Option<Term>,
    pub object: Option<Term>,
}

impl TriplePattern {
    /// The pattern that matches every triple.
    pub fn any() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<Term>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    #[must_use]
    pub fn with_predicate(mut self, predicate: impl Into<Term>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    #[must_use]
    pub fn with_object(mut self, object: impl Into<Term>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// Returns true if no position is bound.
    pub fn is_any(&self) -> bool {
        self.subject.is_none() && self.predicate.is_none() && self.object.is_none()
    }

    /// Returns the canonical encoding of the bound positions, in subject, predicate, object
    /// order.
    pub fn encoded(&self) -> [Option<String>; 3] {
        [
            self.subject.as_ref().map(encode_term),
            self.predicate.as_ref().map(encode_term),
            self.object.as_ref().map(encode_term),
        ]
    }
}

impl Display for TriplePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let positions = [
            ("?s", &self.subject),
            ("?p", &self.predicate),
            ("?o", &self.object),
        ];
        for (index, (wildcard, term)) in positions.into_iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            match term {
                Some(term) => write!(f, "{term}")?,
                None => f.write_str(wildcard)?,
            }
        }
        Ok(())
    }
}
