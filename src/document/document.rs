//! Document structure for one delimited-file row.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::analysis::field_name::FieldList;
use crate::document::field_value::FieldValue;

/// A document represents a single row to be indexed.
///
/// Fields keep the column order of the source file, followed by any fields
/// added by row extensions. Serializing a document yields a JSON object in that
/// order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    fields: Vec<(String, FieldValue)>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Document { fields: Vec::new() }
    }

    /// Build a document by zipping a field list with one record's values.
    ///
    /// Records shorter than the header are padded with empty text; values
    /// beyond the last header column are ignored.
    pub fn from_record<'a, I>(fields: &FieldList, values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut values = values.into_iter();
        let fields = fields
            .iter()
            .map(|name| {
                let value = values.next().unwrap_or("");
                (name.to_string(), FieldValue::from(value))
            })
            .collect();
        Document { fields }
    }

    /// Add a field value to the document, replacing an existing value.
    pub fn add_field<S: Into<String>>(&mut self, name: S, value: FieldValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Get a field value from the document.
    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    /// Get all field names.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Iterate over mutable field values.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut FieldValue> {
        self.fields.iter_mut().map(|(_, v)| v)
    }

    /// Iterate over fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> FieldList {
        FieldList::new(vec!["ticket_no".into(), "name".into(), "job_desc".into()]).unwrap()
    }

    #[test]
    fn test_from_record() {
        let doc = Document::from_record(&fields(), ["10002", "Zhang Gavin", "aaaa_"]);

        assert_eq!(doc.len(), 3);
        assert_eq!(doc.get_field("name").unwrap().as_text(), Some("Zhang Gavin"));
        assert_eq!(doc.field_names(), vec!["ticket_no", "name", "job_desc"]);
    }

    #[test]
    fn test_from_short_record_pads_with_empty_text() {
        let doc = Document::from_record(&fields(), ["10002"]);

        assert_eq!(doc.len(), 3);
        assert!(doc.get_field("name").unwrap().is_empty_text());
        assert!(doc.get_field("job_desc").unwrap().is_empty_text());
    }

    #[test]
    fn test_from_long_record_ignores_excess() {
        let doc = Document::from_record(&fields(), ["1", "2", "3", "4", "5"]);

        assert_eq!(doc.len(), 3);
        assert_eq!(doc.get_field("job_desc").unwrap().as_text(), Some("3"));
    }

    #[test]
    fn test_add_field_replaces() {
        let mut doc = Document::new();
        doc.add_field("ticket_time", FieldValue::Integer(1));
        doc.add_field("ticket_time", FieldValue::Integer(2));

        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get_field("ticket_time"), Some(&FieldValue::Integer(2)));
    }

    #[test]
    fn test_serialize_keeps_column_order() {
        let mut doc = Document::from_record(&fields(), ["10002", "Zhang Gavin", "aaaa_"]);
        doc.add_field("ticket_time", FieldValue::Integer(90));

        assert_eq!(
            serde_json::to_string(&doc).unwrap(),
            r#"{"ticket_no":"10002","name":"Zhang Gavin","job_desc":"aaaa_","ticket_time":90}"#
        );
    }
}
