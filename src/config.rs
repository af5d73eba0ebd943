//! Configuration for imports and the HTTP client.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::time_value::DurationRule;
use crate::document::converter::InputSource;
use crate::document::converter::csv::CsvOperationConverter;
use crate::error::{BulkloadError, Result};
use crate::transform::RowTransformer;
use crate::transform::extension::{ExtensionKind, ExtensionSet};

/// Default search engine address.
pub const DEFAULT_HOST: &str = "http://127.0.0.1:9200/";

/// Default number of operations per bulk request.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Configuration for the REST client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Base URL of the search engine.
    pub host: String,

    /// Timeout for each request.
    pub timeout: Duration,

    /// Operations per bulk request.
    pub chunk_size: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            timeout: Duration::from_secs(30),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl HttpClientConfig {
    /// Check the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.host.starts_with("http://") || self.host.starts_with("https://")) {
            return Err(BulkloadError::invalid_config(format!(
                "host must be an http(s) URL, got '{}'",
                self.host
            )));
        }
        if self.chunk_size == 0 {
            return Err(BulkloadError::invalid_config("chunk size must be positive"));
        }
        Ok(())
    }
}

/// Configuration for one import.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Destination index name.
    pub index_name: String,

    /// Document type, stored as `_type` and used to select extensions.
    pub doc_type: String,

    /// Where the delimited data is read from.
    pub input: InputSource,

    /// Column position of the document id. If None, the engine assigns ids.
    pub id_field_index: Option<usize>,

    /// Field delimiter byte.
    pub delimiter: u8,

    /// Whether to trim whitespace around values.
    pub trim: bool,

    /// Whether `H:M[:S]` values are converted to minutes.
    pub duration_heuristic: bool,

    /// Explicit extension list. If None, extensions are selected by doc type.
    pub extensions: Option<Vec<ExtensionKind>>,

    /// JSON mapping for the document type.
    pub mapping_file: Option<PathBuf>,

    /// JSON index settings.
    pub settings_file: Option<PathBuf>,

    /// Delete an existing index instead of skipping the import.
    pub delete_existing: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            index_name: String::new(),
            doc_type: String::new(),
            input: InputSource::Stdin,
            id_field_index: None,
            delimiter: b',',
            trim: false,
            duration_heuristic: true,
            extensions: None,
            mapping_file: None,
            settings_file: None,
            delete_existing: false,
        }
    }
}

impl ImportConfig {
    /// Create a configuration for importing `input` into `index_name`.
    pub fn new<S: Into<String>, T: Into<String>>(
        index_name: S,
        doc_type: T,
        input: InputSource,
    ) -> Self {
        Self {
            index_name: index_name.into(),
            doc_type: doc_type.into(),
            input,
            ..Self::default()
        }
    }

    /// Set the id column position.
    pub fn with_id_field_index(mut self, position: Option<usize>) -> Self {
        self.id_field_index = position;
        self
    }

    /// Set the delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether values are trimmed.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Enable or disable the duration heuristic.
    pub fn with_duration_heuristic(mut self, enabled: bool) -> Self {
        self.duration_heuristic = enabled;
        self
    }

    /// Use exactly these extensions.
    pub fn with_extensions(mut self, extensions: Vec<ExtensionKind>) -> Self {
        self.extensions = Some(extensions);
        self
    }

    /// Set the mapping file.
    pub fn with_mapping_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.mapping_file = Some(path.into());
        self
    }

    /// Set the settings file.
    pub fn with_settings_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.settings_file = Some(path.into());
        self
    }

    /// Delete an existing index before importing.
    pub fn with_delete_existing(mut self, delete: bool) -> Self {
        self.delete_existing = delete;
        self
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.index_name.trim().is_empty() {
            return Err(BulkloadError::invalid_config("index name must not be empty"));
        }
        if self.doc_type.trim().is_empty() {
            return Err(BulkloadError::invalid_config("document type must not be empty"));
        }
        if !self.delimiter.is_ascii() || matches!(self.delimiter, b'"' | b'\n' | b'\r') {
            return Err(BulkloadError::invalid_config(format!(
                "unsupported delimiter {:?}",
                self.delimiter as char
            )));
        }
        Ok(())
    }

    /// The extensions this import runs.
    pub fn extension_set(&self) -> ExtensionSet {
        match &self.extensions {
            Some(kinds) => ExtensionSet::from_kinds(kinds.iter().copied()),
            None => ExtensionSet::for_doc_type(&self.doc_type),
        }
    }

    /// Build the row transformer for this import.
    pub fn transformer(&self) -> RowTransformer {
        RowTransformer::new(self.index_name.as_str(), self.doc_type.as_str())
            .with_id_field_index(self.id_field_index)
            .with_duration_rule(DurationRule::new(self.duration_heuristic))
            .with_extensions(self.extension_set())
    }

    /// Build the converter for this import.
    pub fn converter(&self) -> CsvOperationConverter {
        CsvOperationConverter::new(self.transformer())
            .with_delimiter(self.delimiter)
            .with_trim(self.trim)
    }
}

/// Parse a delimiter argument: a single ASCII character, or `\t` / `tab`.
pub fn parse_delimiter(value: &str) -> Result<u8> {
    match value {
        "\\t" | "tab" | "\t" => Ok(b'\t'),
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c as u8),
                _ => Err(BulkloadError::invalid_argument(format!(
                    "delimiter must be a single ASCII character, got '{value}'"
                ))),
            }
        }
    }
}
