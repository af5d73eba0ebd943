//! The import workflow.
//!
//! An import prepares the destination index and then streams the delimited
//! input through the bulk API:
//!
//! 1. the mapping files and the input header are read and validated,
//! 2. an existing index is deleted when `delete_existing` is set; otherwise the
//!    import is skipped and the index is left untouched,
//! 3. the index is created from the mapping/settings files (or an empty body),
//! 4. operations are pulled from the input by the client's bulk call.

use log::info;
use serde::{Deserialize, Serialize};

use crate::client::{BulkSummary, SearchClient};
use crate::config::ImportConfig;
use crate::document::index_body::IndexBody;
use crate::error::Result;

/// What an import did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Destination index.
    pub index: String,
    /// Input description.
    pub source: String,
    /// An existing index was deleted first.
    pub deleted_existing: bool,
    /// The index already existed and nothing was imported.
    pub skipped: bool,
    /// Field names used, followed by derived fields.
    pub fields: Vec<String>,
    /// Names of the active row extensions.
    pub extensions: Vec<String>,
    /// Bulk outcome; None when skipped.
    pub summary: Option<BulkSummary>,
}

/// Runs imports against a search client.
pub struct Importer<'a> {
    client: &'a dyn SearchClient,
}

impl<'a> Importer<'a> {
    /// Create an importer using `client`.
    pub fn new(client: &'a dyn SearchClient) -> Self {
        Importer { client }
    }

    /// Run one import.
    pub fn run(&self, config: &ImportConfig) -> Result<ImportReport> {
        config.validate()?;

        let mut report = ImportReport {
            index: config.index_name.clone(),
            source: config.input.to_string(),
            ..ImportReport::default()
        };

        // Everything that can fail locally happens before the index is touched.
        let body = IndexBody::from_files(
            &config.doc_type,
            config.mapping_file.as_deref(),
            config.settings_file.as_deref(),
        )?;
        let converter = config.converter();
        let mut stream = converter.convert_reader(config.input.open()?)?;

        if self.client.index_exists(&config.index_name)? {
            if !config.delete_existing {
                info!("Index {} already exists", config.index_name);
                report.skipped = true;
                return Ok(report);
            }
            self.client.delete_index(&config.index_name)?;
            info!("Deleted: {}", config.index_name);
            report.deleted_existing = true;
        }

        info!("Using document type: {}", config.doc_type);
        if let Some(mapping) = &config.mapping_file {
            info!("Applying mapping from: {}", mapping.display());
        }
        self.client.create_index(&config.index_name, &body)?;
        info!("Created new index: {}", config.index_name);

        report.fields = stream.reported_fields();
        report.extensions = converter
            .transformer()
            .extensions()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let summary = self.client.bulk(&mut stream)?;
        info!(
            "Indexed {} documents into {} ({} rejected)",
            summary.indexed, config.index_name, summary.failed
        );
        report.summary = Some(summary);

        Ok(report)
    }
}
