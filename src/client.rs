//! Search engine clients.
//!
//! The importer only needs four things from a search engine: check whether an
//! index exists, create and delete indices, and consume a stream of operations
//! in bulk. [`SearchClient`] captures exactly that surface.
//!
//! - [`http::HttpSearchClient`] talks to an Elasticsearch-compatible REST API.
//! - [`memory::InMemorySearchClient`] keeps everything in process, for dry runs
//!   and tests.

pub mod http;
pub mod memory;

use serde::{Deserialize, Serialize};

use crate::document::index_body::IndexBody;
use crate::document::operation::IndexOperation;
use crate::error::Result;

/// A stream of operations as consumed by [`SearchClient::bulk`].
pub type OperationStream<'a> = dyn Iterator<Item = Result<IndexOperation>> + 'a;

/// The search engine operations used by an import.
pub trait SearchClient {
    /// Whether an index with this name exists.
    fn index_exists(&self, name: &str) -> Result<bool>;

    /// Create an index.
    fn create_index(&self, name: &str, body: &IndexBody) -> Result<()>;

    /// Delete an index.
    fn delete_index(&self, name: &str) -> Result<()>;

    /// Index every operation of `operations`.
    ///
    /// An `Err` item from the stream aborts the call and is returned as is.
    /// Per-document rejections by the engine do not abort; they are counted in
    /// the summary.
    fn bulk(&self, operations: &mut OperationStream<'_>) -> Result<BulkSummary>;
}

/// Upper bound on the error messages kept in a [`BulkSummary`].
pub const MAX_STORED_ERRORS: usize = 100;

/// Outcome of a bulk call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkSummary {
    /// Documents accepted by the engine.
    pub indexed: usize,
    /// Documents rejected by the engine.
    pub failed: usize,
    /// Number of requests sent.
    pub batches: usize,
    /// Error messages of rejected documents, at most [`MAX_STORED_ERRORS`].
    pub errors: Vec<String>,
}

impl BulkSummary {
    /// Fold a batch result into this summary.
    pub fn merge(&mut self, other: BulkSummary) {
        self.indexed += other.indexed;
        self.failed += other.failed;
        self.batches += other.batches;
        for error in other.errors {
            self.record_error(error);
        }
    }

    /// Keep an error message unless the limit has been reached.
    pub fn record_error(&mut self, error: String) {
        if self.errors.len() < MAX_STORED_ERRORS {
            self.errors.push(error);
        }
    }

    /// Whether every document was accepted.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}
