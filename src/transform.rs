//! Row-to-operation transformation.
//!
//! [`RowTransformer`] turns one row into an [`IndexOperation`]:
//!
//! 1. routing metadata (`index`, `type`, and the id column when configured),
//! 2. the duration rule over every text value,
//! 3. the active row extensions,
//! 4. the metadata-wrapped operation.
//!
//! The transformer does no I/O and keeps no per-row state.

pub mod extension;

use crate::analysis::field_name::FieldList;
use crate::analysis::time_value::DurationRule;
use crate::document::document::Document;
use crate::document::operation::{IndexOperation, Metadata};
use crate::error::{BulkloadError, Result};
use crate::transform::extension::ExtensionSet;

/// Maps rows of one delimited file to index operations.
#[derive(Clone, Debug)]
pub struct RowTransformer {
    index_name: String,
    doc_type: String,
    id_field_index: Option<usize>,
    duration_rule: DurationRule,
    extensions: ExtensionSet,
}

impl RowTransformer {
    /// Create a transformer with the duration rule enabled and the extensions
    /// whose tag matches `doc_type`.
    pub fn new<S: Into<String>, T: Into<String>>(index_name: S, doc_type: T) -> Self {
        let doc_type = doc_type.into();
        RowTransformer {
            index_name: index_name.into(),
            extensions: ExtensionSet::for_doc_type(&doc_type),
            doc_type,
            id_field_index: None,
            duration_rule: DurationRule::default(),
        }
    }

    /// Take document ids from the column at `position`.
    pub fn with_id_field_index(mut self, position: Option<usize>) -> Self {
        self.id_field_index = position;
        self
    }

    /// Replace the duration rule.
    pub fn with_duration_rule(mut self, rule: DurationRule) -> Self {
        self.duration_rule = rule;
        self
    }

    /// Replace the active extensions.
    pub fn with_extensions(mut self, extensions: ExtensionSet) -> Self {
        self.extensions = extensions;
        self
    }

    /// Destination index.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Document type.
    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    /// Column position used for ids.
    pub fn id_field_index(&self) -> Option<usize> {
        self.id_field_index
    }

    /// Active extensions.
    pub fn extensions(&self) -> &ExtensionSet {
        &self.extensions
    }

    /// Check that the configured id column exists in `fields`.
    pub fn validate(&self, fields: &FieldList) -> Result<()> {
        self.id_field(fields).map(|_| ())
    }

    fn id_field<'a>(&self, fields: &'a FieldList) -> Result<Option<&'a str>> {
        match self.id_field_index {
            None => Ok(None),
            Some(position) => fields.get(position).map(Some).ok_or_else(|| {
                BulkloadError::field(format!(
                    "id field index {position} is out of range for {} columns",
                    fields.len()
                ))
            }),
        }
    }

    /// Transform one row.
    ///
    /// The id is read before the duration rule runs, so it is always the raw
    /// column text.
    pub fn transform(&self, mut row: Document, fields: &FieldList) -> Result<IndexOperation> {
        let mut meta = Metadata::new(self.index_name.as_str(), self.doc_type.as_str());

        if let Some(id_field) = self.id_field(fields)? {
            let id = row.get_field(id_field).ok_or_else(|| {
                BulkloadError::field(format!("row has no value for id field '{id_field}'"))
            })?;
            meta = meta.with_id(id.to_string());
        }

        for value in row.values_mut() {
            self.duration_rule.apply(value);
        }

        self.extensions.apply(&mut row)?;

        Ok(IndexOperation::new(row, meta))
    }
}
