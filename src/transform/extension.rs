//! Row extensions.
//!
//! An extension runs after the generic row rules and may derive extra fields
//! from a document. Extensions are selected per import, either explicitly or
//! by the capability tag they declare for document types.

use std::fmt;
use std::sync::Arc;

use clap::ValueEnum;

use crate::analysis::time_value::elapsed_minutes;
use crate::document::document::Document;
use crate::document::field_value::FieldValue;
use crate::error::{BulkloadError, Result};

/// A post-transform hook that derives fields for a document.
pub trait RowExtension: Send + Sync + fmt::Debug {
    /// The extension name.
    fn name(&self) -> &'static str;

    /// Capability tag. Document types whose name contains the tag enable this
    /// extension when no explicit extension list is configured.
    fn tag(&self) -> &'static str;

    /// Names of the fields this extension adds.
    fn derived_fields(&self) -> Vec<&str>;

    /// Add derived fields to `document`.
    ///
    /// Returns an error when a column the extension depends on is missing.
    fn apply(&self, document: &mut Document) -> Result<()>;
}

/// Built-in extensions, selectable by name (`--extension ticket`).
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExtensionKind {
    /// Elapsed minutes between ticket creation and close.
    Ticket,
}

impl ExtensionKind {
    /// All built-in extensions.
    pub const ALL: [ExtensionKind; 1] = [ExtensionKind::Ticket];

    /// Create the extension.
    pub fn build(&self) -> Arc<dyn RowExtension> {
        match self {
            ExtensionKind::Ticket => Arc::new(TicketElapsedExtension::default()),
        }
    }
}

/// The extensions active for one import.
#[derive(Clone, Debug, Default)]
pub struct ExtensionSet {
    extensions: Vec<Arc<dyn RowExtension>>,
}

impl ExtensionSet {
    /// An empty set.
    pub fn new() -> Self {
        ExtensionSet::default()
    }

    /// Build the set from an explicit list of built-ins.
    pub fn from_kinds<I: IntoIterator<Item = ExtensionKind>>(kinds: I) -> Self {
        let mut set = ExtensionSet::new();
        for kind in kinds {
            set.push(kind.build());
        }
        set
    }

    /// Select the built-ins whose tag occurs in `doc_type` (case-sensitive).
    pub fn for_doc_type(doc_type: &str) -> Self {
        let mut set = ExtensionSet::new();
        for kind in ExtensionKind::ALL {
            let extension = kind.build();
            if doc_type.contains(extension.tag()) {
                set.push(extension);
            }
        }
        set
    }

    /// Add an extension.
    pub fn push(&mut self, extension: Arc<dyn RowExtension>) {
        self.extensions.push(extension);
    }

    /// Whether no extension is active.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Names of the active extensions.
    pub fn names(&self) -> Vec<&'static str> {
        self.extensions.iter().map(|e| e.name()).collect()
    }

    /// All fields derived by the active extensions, in order.
    pub fn derived_fields(&self) -> Vec<&str> {
        self.extensions
            .iter()
            .flat_map(|e| e.derived_fields())
            .collect()
    }

    /// Apply every extension to `document`, stopping at the first error.
    pub fn apply(&self, document: &mut Document) -> Result<()> {
        for extension in &self.extensions {
            extension.apply(document)?;
        }
        Ok(())
    }
}

/// Timestamp format of helpdesk ticket exports.
pub const TICKET_TIME_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Derives the minutes between a ticket's creation and close timestamps.
#[derive(Clone, Debug)]
pub struct TicketElapsedExtension {
    start_field: String,
    end_field: String,
    target_field: String,
    format: String,
}

impl TicketElapsedExtension {
    /// Create an extension reading `start_field` and `end_field` in `format`
    /// and writing `target_field`.
    pub fn new<S: Into<String>>(start_field: S, end_field: S, target_field: S, format: S) -> Self {
        TicketElapsedExtension {
            start_field: start_field.into(),
            end_field: end_field.into(),
            target_field: target_field.into(),
            format: format.into(),
        }
    }

    fn timestamp<'a>(&self, document: &'a Document, field: &str) -> Result<&'a str> {
        let value = document.get_field(field).ok_or_else(|| {
            BulkloadError::field(format!(
                "{} extension requires a '{field}' column",
                self.name()
            ))
        })?;
        // Integer values cannot be timestamps; they fall through to the
        // best-effort parse and yield 0.
        Ok(value.as_text().unwrap_or(""))
    }
}

impl Default for TicketElapsedExtension {
    fn default() -> Self {
        TicketElapsedExtension::new("create_time", "close_time", "ticket_time", TICKET_TIME_FORMAT)
    }
}

impl RowExtension for TicketElapsedExtension {
    fn name(&self) -> &'static str {
        "ticket"
    }

    fn tag(&self) -> &'static str {
        "ticket"
    }

    fn derived_fields(&self) -> Vec<&str> {
        vec![self.target_field.as_str()]
    }

    fn apply(&self, document: &mut Document) -> Result<()> {
        let start = self.timestamp(document, &self.start_field)?;
        let end = self.timestamp(document, &self.end_field)?;
        let minutes = elapsed_minutes(start, end, &self.format);
        document.add_field(self.target_field.clone(), FieldValue::Integer(minutes));
        Ok(())
    }
}
