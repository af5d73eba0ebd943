//! Header normalization.
//!
//! Column headers in delimited exports are free text ("Ticket No.",
//! "Work Title", "createTime"). The search engine wants plain identifiers, so
//! every header goes through [`FieldNameNormalizer`] before it is used as a
//! document key:
//!
//! ```
//! use bulkload::analysis::field_name::normalize;
//!
//! assert_eq!(normalize("This is  a--testString.!"), "this_is_a_test_string");
//! assert_eq!(normalize("Ticket No."), "ticket_no");
//! assert_eq!(normalize("123"), "");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

use lazy_static::lazy_static;
use log::info;
use regex::Regex;

use crate::error::{BulkloadError, Result};

lazy_static! {
    /// An acronym run (two or more capitals) or a letter followed by lowercase letters.
    static ref WORD_PATTERN: Regex =
        Regex::new(r"[A-Z][A-Z]+|[a-zA-Z][a-z]*").expect("word pattern is valid");
}

/// Turns raw header text into a lowercase, underscore-joined field name.
///
/// The normalizer works in four passes:
///
/// 1. trim surrounding whitespace,
/// 2. drop everything that is not a letter, a space, `-` or `_`,
/// 3. extract words with [`WORD_PATTERN`] (camel case boundaries split words,
///    capital runs stay together),
/// 4. join the words with `_` and lowercase the result.
///
/// Separators are never copied into the output, so runs of punctuation or
/// whitespace collapse into a single underscore and the output never starts or
/// ends with one.
#[derive(Clone, Debug, Default)]
pub struct FieldNameNormalizer;

impl FieldNameNormalizer {
    /// Create a new normalizer.
    pub fn new() -> Self {
        FieldNameNormalizer
    }

    /// Normalize a single header.
    pub fn normalize(&self, raw: &str) -> String {
        let filtered: String = raw
            .trim()
            .chars()
            .filter(|c| c.is_alphabetic() || matches!(c, ' ' | '-' | '_'))
            .collect();

        WORD_PATTERN
            .find_iter(&filtered)
            .map(|word| word.as_str())
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase()
    }

    /// Normalize a whole header row into a validated [`FieldList`].
    pub fn normalize_headers<I, S>(&self, headers: I) -> Result<FieldList>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let raw: Vec<String> = headers
            .into_iter()
            .map(|header| header.as_ref().to_string())
            .collect();
        let names = raw.iter().map(|header| self.normalize(header)).collect();

        FieldList::new(names).map_err(|e| match e {
            BulkloadError::Header(msg) => {
                BulkloadError::header(format!("{msg} (raw header: {raw:?})"))
            }
            other => other,
        })
    }
}

/// Normalize a single header with the default normalizer.
pub fn normalize(raw: &str) -> String {
    FieldNameNormalizer::new().normalize(raw)
}

/// The ordered, normalized field names of a delimited file.
///
/// Position matters: it is the column index used to pick the document id.
/// Construction rejects empty names and names that collide after
/// normalization, since either would silently drop a column from every
/// document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldList {
    names: Vec<String>,
}

impl FieldList {
    /// Build a field list from already-normalized names.
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            return Err(BulkloadError::header("header row has no columns"));
        }

        let mut seen: HashMap<&str, usize> = HashMap::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(BulkloadError::header(format!(
                    "column {position} normalizes to an empty field name"
                )));
            }
            if let Some(first) = seen.insert(name.as_str(), position) {
                return Err(BulkloadError::header(format!(
                    "columns {first} and {position} both normalize to '{name}'"
                )));
            }
        }

        Ok(FieldList { names })
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false for a constructed list; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Field name at a column position.
    pub fn get(&self, position: usize) -> Option<&str> {
        self.names.get(position).map(|s| s.as_str())
    }

    /// Position of a field name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Iterate over the field names in column order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }

    /// The names as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    /// The field names followed by any derived fields, for reporting.
    pub fn with_derived<'a, I>(&self, derived: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.names
            .iter()
            .cloned()
            .chain(derived.into_iter().map(str::to_string))
            .collect()
    }

    /// Log the fields that will be used, one per line.
    pub fn log_fields<'a, I>(&self, derived: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let reported = self.with_derived(derived);
        info!("Using the following {} fields:", reported.len());
        for field in &reported {
            info!("{field}");
        }
    }
}

impl Index<usize> for FieldList {
    type Output = str;

    fn index(&self, position: usize) -> &str {
        &self.names[position]
    }
}

impl fmt::Display for FieldList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names.join(","))
    }
}
