//! The canonical string encoding of RDF terms.
//!
//! Terms are stored in tabular cells using the term syntax of
//! [N-Triples](https://www.w3.org/TR/n-triples/):
//!
//! | Term                      | Encoding                 |
//! |---------------------------|--------------------------|
//! | IRI                       | `<http://example.com/a>` |
//! | Simple literal            | `"text"`                 |
//! | Language-tagged literal   | `"text"@en`              |
//! | Typed literal             | `"1"^^<http://www.w3.org/2001/XMLSchema#integer>` |
//! | Blank node                | `_:b0`                   |
//!
//! The encoding is lossless: `decode_term(&encode_term(t)) == t` for every term. Two terms are
//! equal if and only if their encodings are equal, which allows matching stored triples by
//! comparing strings.
//!
//! ```
//! use rdf_tabular_model::codec::{decode_term, encode_term};
//! use rdf_tabular_model::{Literal, Term};
//!
//! let term = Term::from(Literal::new_language_tagged_literal("chat", "fr")?);
//! let encoded = encode_term(&term);
//! assert_eq!(encoded, "\"chat\"@fr");
//! assert_eq!(decode_term(&encoded)?, term);
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

use crate::error::{TermDecodingError, TermDecodingErrorKind, TriplePosition};
use oxrdf::{NamedNode, Subject, Term, TermRef, Triple, TripleRef};
use std::str::FromStr;

/// Encodes `term` into its canonical string.
pub fn encode_term<'a>(term: impl Into<TermRef<'a>>) -> String {
    term.into().to_string()
}

/// Encodes the three components of `triple`.
pub fn encode_triple<'a>(triple: impl Into<TripleRef<'a>>) -> EncodedTriple {
    let triple = triple.into();
    EncodedTriple {
        subject: triple.subject.to_string(),
        predicate: triple.predicate.to_string(),
        object: triple.object.to_string(),
    }
}

/// Decodes a canonical string into a term.
///
/// Blank nodes keep the identifier of the encoding. Hence, decoding the same string twice yields
/// equal blank nodes.
pub fn decode_term(encoded: &str) -> Result<Term, TermDecodingError> {
    Term::from_str(encoded).map_err(|error| TermDecodingError::new(encoded, error))
}

/// Decodes a canonical string that must hold a valid triple subject (IRI or blank node).
pub fn decode_subject(encoded: &str) -> Result<Subject, TermDecodingError> {
    let term = decode_term(encoded)?;
    let actual = term_kind(&term);
    Subject::try_from(term).map_err(|_| {
        TermDecodingError::new(
            encoded,
            TermDecodingErrorKind::InvalidPosition {
                position: TriplePosition::Subject,
                actual,
            },
        )
    })
}

/// Decodes a canonical string that must hold a valid triple predicate (IRI).
pub fn decode_predicate(encoded: &str) -> Result<NamedNode, TermDecodingError> {
    let term = decode_term(encoded)?;
    let actual = term_kind(&term);
    NamedNode::try_from(term).map_err(|_| {
        TermDecodingError::new(
            encoded,
            TermDecodingErrorKind::InvalidPosition {
                position: TriplePosition::Predicate,
                actual,
            },
        )
    })
}

/// Decodes the three encoded components of a triple.
pub fn decode_triple(
    subject: &str,
    predicate: &str,
    object: &str,
) -> Result<Triple, TermDecodingError> {
    Ok(Triple::new(
        decode_subject(subject)?,
        decode_predicate(predicate)?,
        decode_term(object)?,
    ))
}

/// The lexical value of a term, without any syntax around it.
///
/// This is the IRI for named nodes, the identifier for blank nodes, and the value (without
/// language tag or datatype) for literals. Unlike [encode_term], this is lossy.
pub fn lexical_value<'a>(term: impl Into<TermRef<'a>>) -> String {
    match term.into() {
        TermRef::NamedNode(node) => node.as_str().to_owned(),
        TermRef::BlankNode(node) => node.as_str().to_owned(),
        TermRef::Literal(literal) => literal.value().to_owned(),
        #[allow(unreachable_patterns, reason = "Only reachable with RDF-star enabled")]
        other => other.to_string(),
    }
}

/// A triple whose components hold their canonical encoding.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EncodedTriple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl EncodedTriple {
    /// Decodes the triple.
    pub fn decode(&self) -> Result<Triple, TermDecodingError> {
        decode_triple(&self.subject, &self.predicate, &self.object)
    }
}

fn term_kind(term: &Term) -> &'static str {
    if term.is_named_node() {
        "IRI"
    } else if term.is_blank_node() {
        "blank node"
    } else if term.is_literal() {
        "literal"
    } else {
        "triple term"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::vocab::xsd;
    use oxrdf::{BlankNode, Literal, NamedNode};

    fn assert_round_trip(term: Term) {
        let encoded = encode_term(&term);
        assert_eq!(decode_term(&encoded).unwrap(), term, "encoding: {encoded}");
    }

    #[test]
    fn round_trip_iri() {
        assert_round_trip(NamedNode::new_unchecked("http://example.com/book/1").into());
    }

    #[test]
    fn round_trip_simple_literal() {
        assert_round_trip(Literal::new_simple_literal("The \"Hitchhiker's\"\nGuide").into());
    }

    #[test]
    fn round_trip_language_tagged_literal() {
        assert_round_trip(
            Literal::new_language_tagged_literal_unchecked("la ville lumi\u{E8}re", "fr").into(),
        );
    }

    #[test]
    fn round_trip_typed_literal() {
        assert_round_trip(Literal::new_typed_literal("2000000", xsd::INTEGER).into());
        assert_round_trip(Literal::new_typed_literal("-300", xsd::G_YEAR).into());
    }

    #[test]
    fn round_trip_blank_node() {
        assert_round_trip(BlankNode::new_unchecked("b42").into());
        assert_round_trip(BlankNode::default().into());
    }

    #[test]
    fn encoding_uses_ntriples_syntax() {
        let iri = NamedNode::new_unchecked("http://example.com/a");
        let typed = Literal::new_typed_literal("1", xsd::INTEGER);
        let bnode = BlankNode::new_unchecked("x");

        assert_eq!(encode_term(&iri), "<http://example.com/a>");
        assert_eq!(
            encode_term(&typed),
            "\"1\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
        assert_eq!(encode_term(&bnode), "_:x");
        assert_eq!(encode_term(&Literal::new_simple_literal("a")), "\"a\"");
    }

    #[test]
    fn decode_rejects_garbage() {
        let error = decode_term("not a term").unwrap_err();
        assert_eq!(error.encoded(), "not a term");
        assert!(matches!(error.kind(), TermDecodingErrorKind::Syntax(_)));
    }

    #[test]
    fn decode_subject_rejects_literal() {
        let error = decode_subject("\"a\"").unwrap_err();
        assert!(matches!(
            error.kind(),
            TermDecodingErrorKind::InvalidPosition {
                position: TriplePosition::Subject,
                actual: "literal"
            }
        ));
    }

    #[test]
    fn decode_predicate_rejects_blank_node() {
        assert!(decode_predicate("_:p").is_err());
    }

    #[test]
    fn triple_round_trip() {
        let triple = Triple::new(
            BlankNode::new_unchecked("s"),
            NamedNode::new_unchecked("http://example.com/p"),
            Literal::new_language_tagged_literal_unchecked("v", "en"),
        );
        let encoded = encode_triple(&triple);
        assert_eq!(encoded.subject, "_:s");
        assert_eq!(encoded.decode().unwrap(), triple);
    }

    #[test]
    fn lexical_value_strips_syntax() {
        assert_eq!(
            lexical_value(&Term::from(NamedNode::new_unchecked("http://e.com/a"))),
            "http://e.com/a"
        );
        assert_eq!(
            lexical_value(&Term::from(Literal::new_language_tagged_literal_unchecked(
                "chat", "fr"
            ))),
            "chat"
        );
        assert_eq!(
            lexical_value(&Term::from(BlankNode::new_unchecked("b1"))),
            "b1"
        );
    }
}
