//! Document module.
//!
//! This module provides the structures that flow from a delimited file to the
//! bulk API.
//!
//! # Core Components
//!
//! - [`document::Document`] - One row, keyed by normalized field names
//! - [`field_value::FieldValue`] - Text or integer field values
//! - [`operation::IndexOperation`] - A document wrapped with routing metadata
//! - [`index_body::IndexBody`] - Settings and mappings for index creation
//! - [`converter`] - Streaming conversion of files into operations
//!
//! # Examples
//!
//! ```
//! use bulkload::analysis::field_name::FieldNameNormalizer;
//! use bulkload::document::document::Document;
//! use bulkload::document::operation::{IndexOperation, Metadata};
//!
//! let fields = FieldNameNormalizer::new()
//!     .normalize_headers(["Ticket No", "Name"])
//!     .unwrap();
//! let doc = Document::from_record(&fields, ["10002", "Zhang Gavin"]);
//! let op = IndexOperation::new(doc, Metadata::new("qd", "ticket").with_id("10002"));
//!
//! assert_eq!(op.id(), Some("10002"));
//! assert_eq!(op.source().len(), 2);
//! ```

pub mod converter;
#[allow(clippy::module_inception)]
pub mod document;
pub mod field_value;
pub mod index_body;
pub mod operation;
