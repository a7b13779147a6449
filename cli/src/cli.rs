use clap::{Parser, Subcommand, ValueHint};
use rdf_tabular::remote::ResultTermMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "rdf-tabular")]
/// RDF Tabular command line toolkit
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a SELECT or CONSTRUCT query against a SPARQL endpoint and write the results as CSV
    Query {
        /// URL of the SPARQL endpoint
        #[arg(short, long, value_hint = ValueHint::Url)]
        endpoint: String,
        /// The SPARQL query
        #[arg(short, long, conflicts_with = "query_file")]
        query: Option<String>,
        /// File to read the SPARQL query from
        #[arg(long, required_unless_present = "query", value_hint = ValueHint::FilePath)]
        query_file: Option<PathBuf>,
        /// Maximal number of rows to return
        #[arg(long)]
        limit: Option<usize>,
        /// How terms are written in the cells
        ///
        /// "raw" writes the lexical values, "canonical" and "term" write the N-Triples encoding.
        #[arg(long, default_value_t = ResultTermMode::Raw)]
        mode: ResultTermMode,
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// File to write the CSV results to
        ///
        /// If no file is given, stdout is written.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
    /// Load a RDF file into a CSV dataset
    Load {
        #[command(flatten)]
        dataset: DatasetArgs,
        /// File to load
        ///
        /// If no file is given, stdin is read.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// The format of the file to load
        ///
        /// It can be an extension like "nt" or a MIME type like "application/n-triples".
        ///
        /// By default the format is guessed from the loaded file extension.
        #[arg(long, required_unless_present = "file")]
        format: Option<String>,
        /// Base IRI of the file to read
        #[arg(long, value_hint = ValueHint::Url)]
        base: Option<String>,
        /// Number of staged triples that triggers a write to the dataset
        #[arg(long)]
        autocommit_threshold: Option<usize>,
    },
    /// Print the triples of a CSV dataset matching a pattern as N-Triples
    ///
    /// Terms are given in N-Triples syntax, e.g. "<http://example.com/s>" or "\"foo\"@en".
    Match {
        #[command(flatten)]
        dataset: DatasetArgs,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        predicate: Option<String>,
        #[arg(long)]
        object: Option<String>,
    },
    /// Dump a CSV dataset to a RDF file
    Dump {
        #[command(flatten)]
        dataset: DatasetArgs,
        /// File to dump to
        ///
        /// If no file is given, stdout is written.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        to_file: Option<PathBuf>,
        /// The format of the file to dump to
        ///
        /// It can be an extension like "nt" or a MIME type like "application/n-triples".
        ///
        /// By default the format is guessed from the target file extension.
        #[arg(long, required_unless_present = "to_file")]
        to_format: Option<String>,
    },
}

/// The CSV dataset holding the triples.
#[derive(clap::Args)]
pub struct DatasetArgs {
    /// CSV file of the dataset
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub dataset: PathBuf,
    #[arg(long, default_value = "subject")]
    pub subject_column: String,
    #[arg(long, default_value = "predicate")]
    pub predicate_column: String,
    #[arg(long, default_value = "object")]
    pub object_column: String,
}
