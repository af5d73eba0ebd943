//! CSV format operation converter.
//!
//! Converts delimited data into index operations where the first record holds
//! the column headers:
//! ```csv
//! Ticket No,Name,Work Title,Job Desc
//! 10002,Zhang Gavin,supervisor,aaaa_
//! ```
//!
//! Headers are normalized into field names once; each following record becomes
//! one operation. Records are read one at a time while the caller pulls, so
//! memory use does not grow with the file.

use std::fs::File;
use std::io::Read;
use std::iter::FusedIterator;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};
use log::debug;

use crate::analysis::field_name::{FieldList, FieldNameNormalizer};
use crate::document::converter::OperationConverter;
use crate::document::document::Document;
use crate::document::operation::IndexOperation;
use crate::error::{BulkloadError, Result};
use crate::transform::RowTransformer;

/// An operation converter for CSV and other single-byte-delimited formats.
#[derive(Clone, Debug)]
pub struct CsvOperationConverter {
    transformer: RowTransformer,
    normalizer: FieldNameNormalizer,
    /// Delimiter byte (default: ',')
    delimiter: u8,
    /// Whether to trim whitespace around values
    trim: bool,
}

impl CsvOperationConverter {
    /// Create a comma-delimited converter.
    pub fn new(transformer: RowTransformer) -> Self {
        CsvOperationConverter {
            transformer,
            normalizer: FieldNameNormalizer::new(),
            delimiter: b',',
            trim: false,
        }
    }

    /// Set a custom delimiter byte.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to trim whitespace around values.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// The row transformer used for every record.
    pub fn transformer(&self) -> &RowTransformer {
        &self.transformer
    }

    fn reader<R: Read>(&self, input: R) -> Reader<R> {
        ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .trim(if self.trim { csv::Trim::All } else { csv::Trim::None })
            .from_reader(input)
    }

    /// Read only the header record of `input` and normalize it.
    pub fn read_fields<R: Read>(&self, input: R) -> Result<FieldList> {
        let mut reader = self.reader(input);
        read_header(&mut reader, &self.normalizer)
    }

    /// Start a stream of operations over any reader.
    ///
    /// The header is read and validated immediately. The returned stream owns
    /// `input` and drops it once the last record has been read, after the first
    /// error, or when the stream itself is dropped.
    pub fn convert_reader<R: Read>(&self, input: R) -> Result<CsvOperationStream<R>> {
        let mut reader = self.reader(input);
        let fields = read_header(&mut reader, &self.normalizer)?;
        self.transformer.validate(&fields)?;

        fields.log_fields(self.transformer.extensions().derived_fields());

        Ok(CsvOperationStream {
            reader: Some(reader),
            fields,
            transformer: self.transformer.clone(),
            record: StringRecord::new(),
            emitted: 0,
        })
    }
}

impl OperationConverter for CsvOperationConverter {
    type Iter = CsvOperationStream<File>;

    fn convert<P: AsRef<Path>>(&self, path: P) -> Result<Self::Iter> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            std::io::Error::new(e.kind(), format!("cannot open {}: {e}", path.display()))
        })?;
        self.convert_reader(file)
    }
}

fn read_header<R: Read>(
    reader: &mut Reader<R>,
    normalizer: &FieldNameNormalizer,
) -> Result<FieldList> {
    let mut header = StringRecord::new();
    if !reader.read_record(&mut header)? {
        return Err(BulkloadError::header("input has no header row"));
    }
    normalizer.normalize_headers(header.iter())
}

/// A lazy, single-pass stream of index operations over delimited data.
///
/// Yields `Ok` for every record until the input is exhausted. The first
/// error (unreadable record, missing column) is yielded once and ends the
/// stream. To read the data again, convert the input again.
pub struct CsvOperationStream<R: Read> {
    reader: Option<Reader<R>>,
    fields: FieldList,
    transformer: RowTransformer,
    record: StringRecord,
    emitted: usize,
}

impl<R: Read> CsvOperationStream<R> {
    /// The normalized field names, in column order.
    pub fn fields(&self) -> &FieldList {
        &self.fields
    }

    /// The field names followed by derived fields, as reported to the user.
    pub fn reported_fields(&self) -> Vec<String> {
        self.fields
            .with_derived(self.transformer.extensions().derived_fields())
    }

    /// Number of operations produced so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Whether the underlying reader has been released.
    pub fn is_finished(&self) -> bool {
        self.reader.is_none()
    }

    fn finish(&mut self) {
        if self.reader.take().is_some() {
            debug!("Stream finished after {} operations", self.emitted);
        }
    }

    fn next_operation(&mut self) -> Option<Result<IndexOperation>> {
        let reader = self.reader.as_mut()?;
        match reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                let row = Document::from_record(&self.fields, self.record.iter());
                Some(self.transformer.transform(row, &self.fields))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

impl<R: Read> Iterator for CsvOperationStream<R> {
    type Item = Result<IndexOperation>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_operation() {
            Some(Ok(op)) => {
                self.emitted += 1;
                Some(Ok(op))
            }
            Some(Err(e)) => {
                self.finish();
                Some(Err(e))
            }
            None => {
                self.finish();
                None
            }
        }
    }
}

impl<R: Read> FusedIterator for CsvOperationStream<R> {}

impl<R: Read> std::fmt::Debug for CsvOperationStream<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvOperationStream")
            .field("fields", &self.fields)
            .field("transformer", &self.transformer)
            .field("emitted", &self.emitted)
            .field("finished", &self.is_finished())
            .finish()
    }
}
