//! In-process search client.
//!
//! Stores index bodies and operations in memory. Tests use it to inspect what
//! would have been sent. `import --dry-run` uses [`InMemorySearchClient::counting`],
//! which only counts operations, so a dry run keeps one row in memory at a time.

use std::collections::HashMap;

use log::debug;
use parking_lot::RwLock;

use crate::client::{BulkSummary, OperationStream, SearchClient};
use crate::document::index_body::IndexBody;
use crate::document::operation::IndexOperation;
use crate::error::{BulkloadError, Result};

/// One stored index.
#[derive(Clone, Debug, Default)]
pub struct MemoryIndex {
    /// Body the index was created with.
    pub body: IndexBody,
    /// Operations received, in order. Empty for a counting client.
    pub operations: Vec<IndexOperation>,
    /// Number of operations received.
    pub received: usize,
}

/// A [`SearchClient`] backed by a map of indices.
#[derive(Debug, Default)]
pub struct InMemorySearchClient {
    indices: RwLock<HashMap<String, MemoryIndex>>,
    discard_operations: bool,
}

impl InMemorySearchClient {
    /// Create an empty client.
    pub fn new() -> Self {
        InMemorySearchClient::default()
    }

    /// Create a client that counts operations and drops them.
    pub fn counting() -> Self {
        InMemorySearchClient {
            discard_operations: true,
            ..InMemorySearchClient::default()
        }
    }

    /// Names of all indices.
    pub fn index_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.indices.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// A copy of one index.
    pub fn index(&self, name: &str) -> Option<MemoryIndex> {
        self.indices.read().get(name).cloned()
    }

    /// Operations stored for one index.
    pub fn operations(&self, name: &str) -> Vec<IndexOperation> {
        self.index(name).map(|index| index.operations).unwrap_or_default()
    }
}

impl SearchClient for InMemorySearchClient {
    fn index_exists(&self, name: &str) -> Result<bool> {
        Ok(self.indices.read().contains_key(name))
    }

    fn create_index(&self, name: &str, body: &IndexBody) -> Result<()> {
        let mut indices = self.indices.write();
        if indices.contains_key(name) {
            return Err(BulkloadError::client(format!("index '{name}' already exists")));
        }
        indices.insert(
            name.to_string(),
            MemoryIndex {
                body: body.clone(),
                ..MemoryIndex::default()
            },
        );
        Ok(())
    }

    fn delete_index(&self, name: &str) -> Result<()> {
        self.indices
            .write()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| BulkloadError::client(format!("index '{name}' does not exist")))
    }

    fn bulk(&self, operations: &mut OperationStream<'_>) -> Result<BulkSummary> {
        let mut summary = BulkSummary::default();
        for op in operations {
            let op = op?;
            // Like the REST API, bulk creates missing indices on the fly.
            let mut indices = self.indices.write();
            let index = indices.entry(op.index().to_string()).or_default();
            index.received += 1;
            if !self.discard_operations {
                index.operations.push(op);
            }
            summary.indexed += 1;
        }
        if summary.indexed > 0 {
            summary.batches = 1;
        }
        debug!("Stored {} operations in memory", summary.indexed);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::document::Document;
    use crate::document::operation::Metadata;

    fn op(index: &str) -> Result<IndexOperation> {
        Ok(IndexOperation::new(Document::new(), Metadata::new(index, "t")))
    }

    #[test]
    fn test_index_lifecycle() {
        let client = InMemorySearchClient::new();
        assert!(!client.index_exists("qd").unwrap());

        client.create_index("qd", &IndexBody::default()).unwrap();
        assert!(client.index_exists("qd").unwrap());
        assert!(client.create_index("qd", &IndexBody::default()).is_err());

        client.delete_index("qd").unwrap();
        assert!(!client.index_exists("qd").unwrap());
        assert!(client.delete_index("qd").is_err());
    }

    #[test]
    fn test_bulk_stores_operations() {
        let client = InMemorySearchClient::new();
        let mut ops = vec![op("qd"), op("qd"), op("other")].into_iter();

        let summary = client.bulk(&mut ops).unwrap();
        assert_eq!(summary.indexed, 3);
        assert_eq!(client.operations("qd").len(), 2);
        assert_eq!(client.index_names(), vec!["other", "qd"]);
    }

    #[test]
    fn test_counting_client_drops_operations() {
        let client = InMemorySearchClient::counting();
        let mut ops = vec![op("qd"), op("qd"), op("qd")].into_iter();

        let summary = client.bulk(&mut ops).unwrap();
        assert_eq!(summary.indexed, 3);

        let index = client.index("qd").unwrap();
        assert_eq!(index.received, 3);
        assert!(index.operations.is_empty());
    }

    #[test]
    fn test_bulk_stops_at_stream_error() {
        let client = InMemorySearchClient::new();
        let mut ops = vec![
            op("qd"),
            Err(BulkloadError::field("missing close_time")),
            op("qd"),
        ]
        .into_iter();

        assert!(matches!(client.bulk(&mut ops), Err(BulkloadError::Field(_))));
        assert_eq!(client.operations("qd").len(), 1);
        // The remaining operation was never pulled.
        assert_eq!(ops.len(), 1);
    }
}
