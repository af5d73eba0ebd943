//! Elasticsearch-compatible REST client.

use std::collections::HashMap;

use log::{debug, info, warn};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::Value;

use crate::client::{BulkSummary, OperationStream, SearchClient};
use crate::config::HttpClientConfig;
use crate::document::index_body::IndexBody;
use crate::error::{BulkloadError, Result};

/// A blocking client for the index and `_bulk` endpoints.
#[derive(Clone, Debug)]
pub struct HttpSearchClient {
    config: HttpClientConfig,
    client: Client,
}

impl HttpSearchClient {
    /// Create a client for `config.host`.
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder().timeout(config.timeout).gzip(true).build()?;
        info!("Using host: {}", config.host);
        Ok(HttpSearchClient { config, client })
    }

    /// The client configuration.
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.host.trim_end_matches('/'), path)
    }

    fn check_status(response: Response, action: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(BulkloadError::client(format!("{action} failed with {status}: {body}")))
    }

    fn send_batch(&self, body: String, count: usize) -> Result<BulkSummary> {
        debug!("Sending bulk request with {count} operations");
        let response = self
            .client
            .post(self.url("_bulk"))
            .header(CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()?;
        let response = Self::check_status(response, "bulk request")?;
        let parsed: BulkResponse = response.json()?;
        Ok(summarize(parsed))
    }
}

impl SearchClient for HttpSearchClient {
    fn index_exists(&self, name: &str) -> Result<bool> {
        let response = self.client.head(self.url(name)).send()?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(BulkloadError::client(format!(
                "checking index '{name}' returned {status}"
            ))),
        }
    }

    fn create_index(&self, name: &str, body: &IndexBody) -> Result<()> {
        let response = self.client.put(self.url(name)).json(body).send()?;
        Self::check_status(response, &format!("creating index '{name}'"))?;
        Ok(())
    }

    fn delete_index(&self, name: &str) -> Result<()> {
        let response = self.client.delete(self.url(name)).send()?;
        Self::check_status(response, &format!("deleting index '{name}'"))?;
        Ok(())
    }

    fn bulk(&self, operations: &mut OperationStream<'_>) -> Result<BulkSummary> {
        let summary = send_in_chunks(operations, self.config.chunk_size, |body, count| {
            self.send_batch(body, count)
        })?;

        if !summary.is_success() {
            warn!(
                "{} of {} documents were rejected",
                summary.failed,
                summary.failed + summary.indexed
            );
        }
        Ok(summary)
    }
}

/// Pull operations into NDJSON bodies of at most `chunk_size` operations and
/// pass each body to `send` with its operation count.
///
/// An `Err` from the stream is returned at once; the chunk it interrupted is
/// never sent. No empty body is ever sent.
fn send_in_chunks<F>(
    operations: &mut OperationStream<'_>,
    chunk_size: usize,
    mut send: F,
) -> Result<BulkSummary>
where
    F: FnMut(String, usize) -> Result<BulkSummary>,
{
    let mut summary = BulkSummary::default();

    loop {
        let mut body = String::new();
        let mut count = 0;
        while count < chunk_size {
            match operations.next() {
                Some(op) => {
                    op?.write_bulk_lines(&mut body)?;
                    count += 1;
                }
                None => break,
            }
        }

        if count == 0 {
            break;
        }
        summary.merge(send(body, count)?);
        if count < chunk_size {
            break;
        }
    }

    Ok(summary)
}

/// Response body of a `_bulk` request.
#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    items: Vec<HashMap<String, BulkItem>>,
}

/// Result for one document, keyed by action name in the response.
#[derive(Debug, Deserialize)]
struct BulkItem {
    status: u16,
    #[serde(default)]
    error: Option<Value>,
}

fn summarize(response: BulkResponse) -> BulkSummary {
    let mut summary = BulkSummary {
        batches: 1,
        ..BulkSummary::default()
    };

    for item in response.items.into_iter().flat_map(|entry| entry.into_values()) {
        if (200..300).contains(&item.status) && item.error.is_none() {
            summary.indexed += 1;
        } else {
            summary.failed += 1;
            summary.record_error(describe_error(item.status, item.error.as_ref()));
        }
    }
    summary
}

fn describe_error(status: u16, error: Option<&Value>) -> String {
    match error {
        Some(Value::Object(obj)) => {
            let kind = obj.get("type").and_then(Value::as_str).unwrap_or("error");
            let reason = obj.get("reason").and_then(Value::as_str).unwrap_or("");
            format!("{status} {kind}: {reason}")
        }
        Some(other) => format!("{status} {other}"),
        None => format!("{status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MAX_STORED_ERRORS;
    use crate::document::document::Document;
    use crate::document::operation::{IndexOperation, Metadata};

    fn ops(count: usize) -> Vec<Result<IndexOperation>> {
        (0..count)
            .map(|i| {
                Ok(IndexOperation::new(
                    Document::new(),
                    Metadata::new("qd", "ticket").with_id(i.to_string()),
                ))
            })
            .collect()
    }

    /// Send every chunk to a recorder; returns the recorded operation counts.
    fn chunk_counts(
        operations: Vec<Result<IndexOperation>>,
        chunk_size: usize,
    ) -> (Result<BulkSummary>, Vec<usize>) {
        let mut sent = Vec::new();
        let mut iter = operations.into_iter();
        let result = send_in_chunks(&mut iter, chunk_size, |body, count| {
            assert_eq!(body.lines().count(), 2 * count);
            sent.push(count);
            Ok(BulkSummary {
                indexed: count,
                batches: 1,
                ..BulkSummary::default()
            })
        });
        (result, sent)
    }

    #[test]
    fn test_chunks_exact_multiple() {
        let (result, sent) = chunk_counts(ops(4), 2);
        assert_eq!(sent, vec![2, 2]);

        let summary = result.unwrap();
        assert_eq!(summary.indexed, 4);
        assert_eq!(summary.batches, 2);
    }

    #[test]
    fn test_chunks_with_remainder() {
        let (result, sent) = chunk_counts(ops(5), 2);
        assert_eq!(sent, vec![2, 2, 1]);
        assert_eq!(result.unwrap().indexed, 5);
    }

    #[test]
    fn test_chunks_empty_stream_sends_nothing() {
        let (result, sent) = chunk_counts(Vec::new(), 2);
        assert!(sent.is_empty());
        assert_eq!(result.unwrap(), BulkSummary::default());
    }

    #[test]
    fn test_stream_error_drops_partial_chunk() {
        let mut operations = ops(3);
        operations.push(Err(BulkloadError::field("missing close_time")));
        operations.extend(ops(1));

        let mut sent = Vec::new();
        let mut iter = operations.into_iter();
        let result = send_in_chunks(&mut iter, 2, |_, count| {
            sent.push(count);
            Ok(BulkSummary {
                indexed: count,
                batches: 1,
                ..BulkSummary::default()
            })
        });

        assert!(matches!(result, Err(BulkloadError::Field(_))));
        // The first chunk went out; the third operation never did.
        assert_eq!(sent, vec![2]);
        assert_eq!(iter.len(), 1);
    }

    #[test]
    fn test_summarize_caps_stored_errors() {
        let item = r#"{"index": {"status": 409, "error": {"type": "version_conflict_engine_exception", "reason": "conflict"}}}"#;
        let items = vec![item; MAX_STORED_ERRORS + 5].join(",");
        let response: BulkResponse =
            serde_json::from_str(&format!(r#"{{"items": [{items}]}}"#)).unwrap();

        let summary = summarize(response);
        assert_eq!(summary.failed, MAX_STORED_ERRORS + 5);
        assert_eq!(summary.errors.len(), MAX_STORED_ERRORS);
    }

    #[test]
    fn test_summarize_bulk_response() {
        let response: BulkResponse = serde_json::from_str(
            r#"{
                "took": 30,
                "errors": true,
                "items": [
                    {"index": {"_index": "qd", "_id": "10002", "status": 201}},
                    {"index": {"_index": "qd", "_id": "10003", "status": 400,
                        "error": {"type": "mapper_parsing_exception", "reason": "failed to parse field [ticket_no]"}}}
                ]
            }"#,
        )
        .unwrap();

        let summary = summarize(response);
        assert_eq!(summary.indexed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.batches, 1);
        assert_eq!(
            summary.errors,
            vec!["400 mapper_parsing_exception: failed to parse field [ticket_no]"]
        );
    }

    #[test]
    fn test_url_joins_host() {
        let client = HttpSearchClient::new(HttpClientConfig::default()).unwrap();
        assert_eq!(client.url("qd"), "http://127.0.0.1:9200/qd");
        assert_eq!(client.url("_bulk"), "http://127.0.0.1:9200/_bulk");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = HttpClientConfig {
            chunk_size: 0,
            ..HttpClientConfig::default()
        };
        assert!(HttpSearchClient::new(config).is_err());
    }
}
