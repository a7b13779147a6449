//! Loading RDF documents into a [DatasetTripleStore] and dumping its triples.

use crate::error::{FormatGuessError, LoaderError, SerializerError};
use futures::TryStreamExt;
use rdf_tabular_model::{Triple, TriplePattern};
use rdf_tabular_storage::DatasetTripleStore;
use std::ffi::OsStr;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

pub use oxrdfio::{RdfFormat, RdfParser, RdfSerializer};

/// Creates a parser for `format` that resolves relative IRIs against `base_iri`.
pub fn rdf_parser(format: RdfFormat, base_iri: Option<&str>) -> Result<RdfParser, LoaderError> {
    let parser = RdfParser::from_format(format);
    match base_iri {
        Some(iri) => parser
            .with_base_iri(iri)
            .map_err(|error| LoaderError::InvalidBaseIri {
                iri: iri.to_owned(),
                error,
            }),
        None => Ok(parser),
    }
}

/// Loads an RDF document into `store` and commits it.
///
/// Blank nodes are renamed so that loading the same document twice does not merge them. Only
/// the default graph can be loaded, a triple in a named graph fails with
/// [LoaderError::NamedGraph].
///
/// Returns the number of loaded triples. Triples are staged one by one, so some of them may
/// have been committed by an autocommit when an error is raised. The remaining ones stay
/// staged.
pub async fn load_from_reader(
    store: &mut DatasetTripleStore,
    parser: impl Into<RdfParser>,
    reader: impl Read,
) -> Result<usize, LoaderError> {
    let mut count = 0;
    for quad in parser.into().rename_blank_nodes().for_reader(reader) {
        let quad = quad?;
        if !quad.graph_name.is_default_graph() {
            return Err(LoaderError::NamedGraph(quad.graph_name));
        }
        store.add(&Triple::from(quad), None).await?;
        count += 1;
    }
    store.commit().await?;
    debug!("Loaded {count} triples");
    Ok(count)
}

/// Writes the committed triples of `store` matching `pattern` to `writer`.
///
/// With a dataset format, the triples are written in the default graph.
pub async fn dump_to_writer<W: Write>(
    store: &DatasetTripleStore,
    pattern: &TriplePattern,
    serializer: impl Into<RdfSerializer>,
    writer: W,
) -> Result<W, SerializerError> {
    let mut serializer = serializer.into().for_writer(writer);
    let mut triples = store.triples(pattern, None).await?;
    let mut count = 0_usize;
    while let Some(triple) = triples.try_next().await? {
        serializer.serialize_triple(&triple)?;
        count += 1;
    }
    debug!("Dumped {count} triples");
    Ok(serializer.finish()?)
}

/// Finds the RDF format with the given extension (e.g. `nt`) or media type (e.g.
/// `application/n-triples`).
pub fn rdf_format_from_name(name: &str) -> Result<RdfFormat, FormatGuessError> {
    RdfFormat::from_extension(name)
        .or_else(|| RdfFormat::from_media_type(name))
        .ok_or_else(|| FormatGuessError::UnknownName(name.to_owned()))
}

/// Guesses the RDF format of a file from its extension.
pub fn rdf_format_from_path(path: &Path) -> Result<RdfFormat, FormatGuessError> {
    let Some(extension) = path.extension().and_then(OsStr::to_str) else {
        return Err(FormatGuessError::MissingExtension(path.to_owned()));
    };
    RdfFormat::from_extension(extension)
        .ok_or_else(|| FormatGuessError::UnknownExtension(extension.to_owned()))
}
