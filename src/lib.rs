//! # bulkload
//!
//! Bulk-load delimited text files (CSV, TSV, ...) into a document search
//! engine.
//!
//! ## Features
//!
//! - Header normalization into engine-safe field names
//! - Lazy, single-pass conversion of rows into bulk index operations
//! - Duration values (`H:M[:S]`) indexed as minutes
//! - Pluggable row extensions (ticket elapsed time)
//! - Elasticsearch-compatible REST client with chunked `_bulk` requests
//!
//! ## Example
//!
//! ```no_run
//! use bulkload::client::http::HttpSearchClient;
//! use bulkload::config::{HttpClientConfig, ImportConfig};
//! use bulkload::document::converter::InputSource;
//! use bulkload::import::Importer;
//!
//! let client = HttpSearchClient::new(HttpClientConfig::default()).unwrap();
//! let config = ImportConfig::new("qd", "ticket", InputSource::from_arg("tickets.csv"))
//!     .with_id_field_index(Some(0));
//! let report = Importer::new(&client).run(&config).unwrap();
//! println!("{:?}", report.summary);
//! ```

pub mod analysis;
pub mod cli;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod import;
pub mod transform;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
