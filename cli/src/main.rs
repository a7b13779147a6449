use crate::cli::{Args, Command, DatasetArgs};
use anyhow::{bail, Context};
use clap::Parser;
use rdf_tabular::io::{
    dump_to_writer, load_from_reader, rdf_format_from_name, rdf_format_from_path, rdf_parser,
    RdfFormat,
};
use rdf_tabular::model::codec::decode_term;
use rdf_tabular::model::{ColumnDescriptor, RowValue, Term, TriplePattern};
use rdf_tabular::remote::{QueryRows, RemoteQueryExecutor, RemoteQueryOptions};
use rdf_tabular::storage::{CsvDataset, DatasetTripleStore, TripleStoreConfig};
use std::fs::{self, File};
use std::io::{self, stdin, stdout, BufReader, BufWriter, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    install_tracing_subscriber();
    let matches = Args::parse();
    match matches.command {
        Command::Query {
            endpoint,
            query,
            query_file,
            limit,
            mode,
            timeout,
            output,
        } => {
            let query = match (query, query_file) {
                (Some(query), _) => query,
                (None, Some(file)) => fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read the query from {}", file.display()))?,
                (None, None) => bail!("The --query or --query-file option must be set"),
            };
            let mut options = RemoteQueryOptions::default();
            if let Some(timeout) = timeout {
                options.timeout = Duration::from_secs(timeout);
            }
            let rows = RemoteQueryExecutor::with_options(options)?
                .execute_str(&endpoint, &query, limit, mode)
                .await?;
            info!("Received {} rows from {endpoint}", rows.len());

            match output {
                Some(file) => close_file_writer(write_csv(
                    rows,
                    BufWriter::new(File::create(file)?),
                )?),
                None => write_csv(rows, stdout().lock())?.flush(),
            }?;
            Ok(())
        }
        Command::Load {
            dataset,
            file,
            format,
            base,
            autocommit_threshold,
        } => {
            let format = if let Some(format) = format {
                rdf_format_from_name(&format)?
            } else if let Some(file) = &file {
                rdf_format_from_path(file)?
            } else {
                bail!("The --format option must be set when reading from stdin")
            };
            let parser = rdf_parser(format, base.as_deref())?;

            let mut config = store_config(&dataset);
            if let Some(threshold) = autocommit_threshold {
                config = config.with_autocommit_threshold(threshold);
            }
            let mut store = open_store(&dataset, config);
            store.write_schema().await?;

            let count = match file {
                Some(file) => {
                    let reader = File::open(&file)
                        .with_context(|| format!("Failed to open {}", file.display()))?;
                    load_from_reader(&mut store, parser, BufReader::new(reader)).await?
                }
                None => load_from_reader(&mut store, parser, stdin().lock()).await?,
            };
            info!(
                "Loaded {count} triples into {}",
                dataset.dataset.display()
            );
            Ok(())
        }
        Command::Match {
            dataset,
            subject,
            predicate,
            object,
        } => {
            let mut pattern = TriplePattern::any();
            if let Some(subject) = subject {
                pattern = pattern.with_subject(parse_term(&subject)?);
            }
            if let Some(predicate) = predicate {
                pattern = pattern.with_predicate(parse_term(&predicate)?);
            }
            if let Some(object) = object {
                pattern = pattern.with_object(parse_term(&object)?);
            }

            let store = open_store(&dataset, store_config(&dataset));
            dump_to_writer(&store, &pattern, RdfFormat::NTriples, stdout().lock())
                .await?
                .flush()?;
            Ok(())
        }
        Command::Dump {
            dataset,
            to_file,
            to_format,
        } => {
            let format = if let Some(format) = to_format {
                rdf_format_from_name(&format)?
            } else if let Some(file) = &to_file {
                rdf_format_from_path(file)?
            } else {
                bail!("The --to-format option must be set when writing to stdout")
            };

            let store = open_store(&dataset, store_config(&dataset));
            let pattern = TriplePattern::any();
            match to_file {
                Some(file) => close_file_writer(
                    dump_to_writer(
                        &store,
                        &pattern,
                        format,
                        BufWriter::new(File::create(file)?),
                    )
                    .await?,
                ),
                None => dump_to_writer(&store, &pattern, format, stdout().lock())
                    .await?
                    .flush(),
            }?;
            Ok(())
        }
    }
}

fn install_tracing_subscriber() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn store_config(args: &DatasetArgs) -> TripleStoreConfig {
    TripleStoreConfig::default().with_columns(
        &args.subject_column,
        &args.predicate_column,
        &args.object_column,
    )
}

fn open_store(args: &DatasetArgs, config: TripleStoreConfig) -> DatasetTripleStore {
    DatasetTripleStore::new(Arc::new(CsvDataset::new(&args.dataset)), config)
}

fn parse_term(value: &str) -> anyhow::Result<Term> {
    decode_term(value).with_context(|| format!("Invalid term {value}"))
}

fn write_csv<W: Write>(rows: QueryRows, writer: W) -> anyhow::Result<W> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(rows.schema().columns().iter().map(ColumnDescriptor::name))?;
    for row in rows {
        writer.write_record(
            row.values()
                .iter()
                .map(|value| value.as_ref().map(RowValue::to_cell).unwrap_or_default()),
        )?;
    }
    Ok(writer.into_inner().map_err(csv::IntoInnerError::into_error)?)
}

fn close_file_writer(writer: BufWriter<File>) -> io::Result<()> {
    let mut file = writer
        .into_inner()
        .map_err(io::IntoInnerError::into_error)?;
    file.flush()?;
    file.sync_all()
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn, reason = "tests")]
mod tests {
    use super::*;
    use anyhow::Result;
    use assert_cmd::Command;
    use assert_fs::fixture::ChildPath;
    use assert_fs::prelude::*;
    use assert_fs::{NamedTempFile, TempDir};
    use predicates::prelude::*;

    const BOOKS: &str = "<http://example.org/book/book5> <http://www.w3.org/2000/01/rdf-schema#label> \"Life, the Universe and Everything\" .\n<http://example.org/book/book6> <http://www.w3.org/2000/01/rdf-schema#label> \"The Hitchhiker's Guide to the Galaxy\"@en .\n";

    fn cli_command() -> Command {
        let mut command = Command::new(env!("CARGO"));
        command.arg("run").arg("--bin").arg("rdf-tabular");
        command.arg("--");
        command
    }

    fn initialized_dataset(dir: &TempDir) -> ChildPath {
        let dataset = dir.child("triples.csv");
        cli_command()
            .arg("load")
            .arg("--dataset")
            .arg(dataset.path())
            .arg("--format")
            .arg("nt")
            .write_stdin(BOOKS)
            .assert()
            .success();
        dataset
    }

    #[test]
    fn cli_help() {
        cli_command()
            .assert()
            .failure()
            .stdout("")
            .stderr(predicate::str::contains("RDF Tabular"));
    }

    #[test]
    fn cli_load_writes_csv() -> Result<()> {
        let dir = TempDir::new()?;
        let dataset = initialized_dataset(&dir);
        dataset.assert(predicate::str::starts_with("subject,predicate,object\n"));
        dataset.assert(predicate::str::contains(
            "<http://example.org/book/book5>,<http://www.w3.org/2000/01/rdf-schema#label>,\"\"\"Life, the Universe and Everything\"\"\"",
        ));
        Ok(())
    }

    #[test]
    fn cli_load_and_dump() -> Result<()> {
        let dir = TempDir::new()?;
        let dataset = initialized_dataset(&dir);
        cli_command()
            .arg("dump")
            .arg("--dataset")
            .arg(dataset.path())
            .arg("--to-format")
            .arg("nt")
            .assert()
            .stdout(BOOKS)
            .success();
        Ok(())
    }

    #[test]
    fn cli_load_file_with_columns() -> Result<()> {
        let dir = TempDir::new()?;
        let input_file = NamedTempFile::new("input.ttl")?;
        input_file.write_str("@prefix schema: <http://schema.org/> .\n<#me> a schema:Person .\n")?;
        let dataset = dir.child("people.csv");
        cli_command()
            .arg("load")
            .arg("--dataset")
            .arg(dataset.path())
            .arg("--subject-column")
            .arg("s")
            .arg("--predicate-column")
            .arg("p")
            .arg("--object-column")
            .arg("o")
            .arg("--file")
            .arg(input_file.path())
            .arg("--base")
            .arg("http://example.com/")
            .assert()
            .success();
        dataset.assert("s,p,o\n<http://example.com/#me>,<http://www.w3.org/1999/02/22-rdf-syntax-ns#type>,<http://schema.org/Person>\n");
        Ok(())
    }

    #[test]
    fn cli_match() -> Result<()> {
        let dir = TempDir::new()?;
        let dataset = initialized_dataset(&dir);
        cli_command()
            .arg("match")
            .arg("--dataset")
            .arg(dataset.path())
            .arg("--subject")
            .arg("<http://example.org/book/book6>")
            .assert()
            .stdout("<http://example.org/book/book6> <http://www.w3.org/2000/01/rdf-schema#label> \"The Hitchhiker's Guide to the Galaxy\"@en .\n")
            .success();
        Ok(())
    }

    #[test]
    fn cli_match_invalid_term() -> Result<()> {
        let dir = TempDir::new()?;
        let dataset = initialized_dataset(&dir);
        cli_command()
            .arg("match")
            .arg("--dataset")
            .arg(dataset.path())
            .arg("--object")
            .arg("not a term")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid term not a term"));
        Ok(())
    }

    #[test]
    fn cli_query_rejects_ask() {
        cli_command()
            .arg("query")
            .arg("--endpoint")
            .arg("http://localhost:1/sparql")
            .arg("--query")
            .arg("ASK { ?s ?p ?o }")
            .assert()
            .failure()
            .stderr(predicate::str::contains("ASK queries are not supported"));
    }

    #[test]
    fn write_csv_rows() -> Result<()> {
        use rdf_tabular::model::{OutputSchema, Row};

        let schema = OutputSchema::new(vec![
            ColumnDescriptor::string("book"),
            ColumnDescriptor::string("title"),
        ]);
        let rows = vec![
            Row::new(
                schema.column_names(),
                vec![
                    Some(RowValue::from("http://example.org/book/book5")),
                    Some(RowValue::from("Life, the Universe and Everything")),
                ],
            ),
            Row::new(
                schema.column_names(),
                vec![Some(RowValue::from("http://example.org/book/book6")), None],
            ),
        ];
        let csv = write_csv(QueryRows::new(schema, rows), Vec::new())?;
        assert_eq!(
            String::from_utf8(csv)?,
            "book,title\nhttp://example.org/book/book5,\"Life, the Universe and Everything\"\nhttp://example.org/book/book6,\n"
        );
        Ok(())
    }

    #[test]
    fn clap_debug() {
        use clap::CommandFactory;

        Args::command().debug_assert()
    }
}
