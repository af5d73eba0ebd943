//! Index creation bodies.
//!
//! A mapping file holds the field mapping for one document type. It is used
//! verbatim and wrapped under the document type:
//!
//! ```
//! use bulkload::document::index_body::IndexBody;
//! use serde_json::json;
//!
//! let mapping = json!({"properties": {"ticket_no": {"type": "integer"}}});
//! let body = IndexBody::new("ticket", Some(mapping.clone()), None);
//!
//! assert_eq!(
//!     serde_json::to_value(&body).unwrap(),
//!     json!({"mappings": {"ticket": mapping}})
//! );
//! ```

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Settings and mappings sent when creating an index.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mappings: Option<Map<String, Value>>,
}

impl IndexBody {
    /// Build a body from an optional mapping for `doc_type` and optional settings.
    pub fn new(doc_type: &str, mapping: Option<Value>, settings: Option<Value>) -> Self {
        let mappings = mapping.map(|mapping| {
            let mut by_type = Map::new();
            by_type.insert(doc_type.to_string(), mapping);
            by_type
        });
        IndexBody { settings, mappings }
    }

    /// Build a body from mapping and settings JSON files.
    pub fn from_files(
        doc_type: &str,
        mapping_file: Option<&Path>,
        settings_file: Option<&Path>,
    ) -> Result<Self> {
        let mapping = mapping_file.map(load_json).transpose()?;
        let settings = settings_file.map(load_json).transpose()?;
        Ok(IndexBody::new(doc_type, mapping, settings))
    }

    /// True when neither settings nor mappings are set.
    pub fn is_empty(&self) -> bool {
        self.settings.is_none() && self.mappings.is_none()
    }
}

/// Read a JSON object from a file.
pub fn load_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse JSON in {}", path.display()))?;
    if !value.is_object() {
        return Err(anyhow::anyhow!("{} does not contain a JSON object", path.display()).into());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_body_with_settings_only() {
        let body = IndexBody::new("ticket", None, Some(json!({"number_of_shards": 1})));
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"settings": {"number_of_shards": 1}})
        );
    }

    #[test]
    fn test_empty_body() {
        let body = IndexBody::new("ticket", None, None);
        assert!(body.is_empty());
        assert_eq!(serde_json::to_string(&body).unwrap(), "{}");
    }

    #[test]
    fn test_from_files() {
        let mapping = json!({
            "properties": {
                "ticket_no": {"type": "integer"},
                "name": {"type": "string"},
                "work_title": {"type": "string"},
                "job_desc": {"type": "string"}
            }
        });
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{mapping}").unwrap();

        let body = IndexBody::from_files("ticket", Some(file.path()), None).unwrap();
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"mappings": {"ticket": mapping}})
        );
    }

    #[test]
    fn test_load_json_rejects_non_object() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[1, 2, 3]").unwrap();
        assert!(load_json(file.path()).is_err());
    }

    #[test]
    fn test_load_json_missing_file() {
        let err = load_json(Path::new("/nonexistent/mapping.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read /nonexistent/mapping.json"));
    }
}
