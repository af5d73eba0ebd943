//! Bulk index operations.
//!
//! An [`IndexOperation`] is what the bulk API consumes: routing metadata with
//! underscore-prefixed keys plus the document itself under `_source`.
//!
//! ```json
//! { "_index": "qd", "_type": "ticket", "_id": "10002",
//!   "_source": { "ticket_no": "10002", "name": "Zhang Gavin" } }
//! ```

use serde::Serialize;
use serde_json::json;

use crate::document::document::Document;
use crate::error::Result;

/// Routing metadata for one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Metadata {
    /// Destination index name.
    pub index: String,
    /// Document type.
    pub doc_type: String,
    /// Document id, when taken from a column.
    pub id: Option<String>,
}

impl Metadata {
    /// Metadata without an id; the engine assigns one.
    pub fn new<S: Into<String>, T: Into<String>>(index: S, doc_type: T) -> Self {
        Metadata {
            index: index.into(),
            doc_type: doc_type.into(),
            id: None,
        }
    }

    /// Set the document id.
    pub fn with_id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// One document-indexing operation.
///
/// Built once per row and never modified afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IndexOperation {
    #[serde(rename = "_index")]
    index: String,
    #[serde(rename = "_type")]
    doc_type: String,
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(rename = "_source")]
    source: Document,
}

impl IndexOperation {
    /// Wrap a document with its metadata.
    pub fn new(source: Document, meta: Metadata) -> Self {
        IndexOperation {
            index: meta.index,
            doc_type: meta.doc_type,
            id: meta.id,
            source,
        }
    }

    /// Destination index.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Document type.
    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    /// Document id, if one was assigned.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The document payload.
    pub fn source(&self) -> &Document {
        &self.source
    }

    /// Render this operation as the two NDJSON lines of a `_bulk` request body
    /// (action line, then source line), each terminated by a newline.
    pub fn write_bulk_lines(&self, out: &mut String) -> Result<()> {
        let mut action = json!({
            "_index": self.index,
            "_type": self.doc_type,
        });
        if let Some(id) = &self.id {
            action["_id"] = json!(id);
        }

        out.push_str(&serde_json::to_string(&json!({ "index": action }))?);
        out.push('\n');
        out.push_str(&serde_json::to_string(&self.source)?);
        out.push('\n');
        Ok(())
    }
}
