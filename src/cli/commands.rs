//! Command implementations for the bulkload CLI.

use std::fs::File;
use std::time::{Duration, Instant};

use anyhow::Context;
use log::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::client::SearchClient;
use crate::client::http::HttpSearchClient;
use crate::client::memory::InMemorySearchClient;
use crate::config::{HttpClientConfig, ImportConfig, parse_delimiter};
use crate::document::converter::InputSource;
use crate::document::converter::csv::CsvOperationConverter;
use crate::error::{BulkloadError, Result};
use crate::transform::RowTransformer;

/// Execute a CLI command.
pub fn execute_command(args: BulkloadArgs) -> Result<()> {
    match &args.command {
        Command::Import(import_args) => import_file(import_args.clone(), &args),
        Command::Headers(headers_args) => show_headers(headers_args.clone(), &args),
    }
}

/// Build the import configuration from command line arguments.
pub fn import_config(args: &ImportArgs) -> Result<ImportConfig> {
    let mut config = ImportConfig::new(
        args.index_name.as_str(),
        args.doc_type.as_str(),
        InputSource::from_arg(&args.import_file),
    )
    .with_id_field_index(args.id_field_idx)
    .with_delimiter(parse_delimiter(&args.delimiter)?)
    .with_trim(args.trim)
    .with_duration_heuristic(!args.no_duration_heuristic)
    .with_delete_existing(args.delete_index);

    if !args.extensions.is_empty() {
        config = config.with_extensions(args.extensions.clone());
    }
    if let Some(mapping) = &args.mapping_file {
        config = config.with_mapping_file(mapping);
    }
    if let Some(settings) = &args.settings_file {
        config = config.with_settings_file(settings);
    }
    Ok(config)
}

/// Import a delimited file.
fn import_file(args: ImportArgs, cli_args: &BulkloadArgs) -> Result<()> {
    let config = import_config(&args)?;

    let client: Box<dyn SearchClient> = if args.dry_run {
        info!("Dry run: documents are counted, nothing is sent");
        Box::new(InMemorySearchClient::counting())
    } else {
        Box::new(HttpSearchClient::new(HttpClientConfig {
            host: args.host.clone(),
            timeout: Duration::from_secs(args.timeout),
            chunk_size: args.chunk_size,
        })?)
    };

    let start_time = Instant::now();
    let report = crate::import::Importer::new(client.as_ref()).run(&config)?;
    let duration = start_time.elapsed();

    let indexed = report.summary.as_ref().map(|s| s.indexed).unwrap_or(0);
    let failed = report.summary.as_ref().map(|s| s.failed).unwrap_or(0);
    let skipped = report.skipped;

    output_result(
        "Import finished",
        &ImportResult {
            report,
            dry_run: args.dry_run,
            duration_ms: duration.as_millis() as u64,
            docs_per_second: if duration.as_secs_f64() > 0.0 {
                indexed as f64 / duration.as_secs_f64()
            } else {
                0.0
            },
        },
        cli_args,
    )?;

    if failed > 0 {
        return Err(BulkloadError::client(format!(
            "{failed} documents were rejected by the search engine"
        )));
    }
    if skipped {
        info!("Nothing imported");
    }
    Ok(())
}

/// Print the normalized field names of a file.
fn show_headers(args: HeadersArgs, cli_args: &BulkloadArgs) -> Result<()> {
    let file = File::open(&args.filename)
        .with_context(|| format!("cannot open {}", args.filename.display()))?;

    // Headers only: no id column, no extensions.
    let converter = CsvOperationConverter::new(RowTransformer::new("", ""))
        .with_delimiter(parse_delimiter(&args.delimiter)?);
    let fields = converter.read_fields(file)?;

    let fields = insert_field(
        fields.as_slice().to_vec(),
        args.insert_field.as_deref(),
        args.position,
    )?;

    output_result(
        "",
        &HeadersResult {
            file: args.filename.display().to_string(),
            fields,
        },
        cli_args,
    )
}

/// Insert `field` at `position`, or append it when no position is given.
fn insert_field(
    mut fields: Vec<String>,
    field: Option<&str>,
    position: Option<usize>,
) -> Result<Vec<String>> {
    let Some(field) = field else {
        return Ok(fields);
    };
    match position {
        Some(position) if position > fields.len() => Err(BulkloadError::invalid_argument(
            format!("position {position} is past the end of {} fields", fields.len()),
        )),
        Some(position) => {
            fields.insert(position, field.to_string());
            Ok(fields)
        }
        None => {
            fields.push(field.to_string());
            Ok(fields)
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::transform::extension::ExtensionKind;

    fn fields() -> Vec<String> {
        vec!["ticket_no".into(), "name".into()]
    }

    #[test]
    fn test_insert_field() {
        assert_eq!(insert_field(fields(), None, None).unwrap(), fields());
        assert_eq!(
            insert_field(fields(), Some("ticket_time"), None).unwrap(),
            vec!["ticket_no", "name", "ticket_time"]
        );
        assert_eq!(
            insert_field(fields(), Some("ticket_time"), Some(0)).unwrap(),
            vec!["ticket_time", "ticket_no", "name"]
        );
        assert!(insert_field(fields(), Some("ticket_time"), Some(3)).is_err());
    }

    #[test]
    fn test_import_config_from_args() {
        let args = BulkloadArgs::try_parse_from([
            "bulkload",
            "import",
            "--index-name",
            "calls",
            "--doc-type",
            "call",
            "--import-file",
            "calls.tsv",
            "--delimiter",
            "tab",
            "--no-duration-heuristic",
            "--extension",
            "ticket",
        ])
        .unwrap();
        let Command::Import(import) = args.command else {
            panic!("Expected import command");
        };

        let config = import_config(&import).unwrap();
        assert_eq!(config.delimiter, b'\t');
        assert!(!config.duration_heuristic);
        assert_eq!(config.extensions, Some(vec![ExtensionKind::Ticket]));
        assert_eq!(config.input, InputSource::from_arg("calls.tsv"));
    }
}
