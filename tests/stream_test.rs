use std::cell::Cell;
use std::io::{self, Read, Write};
use std::rc::Rc;

use bulkload::analysis::field_name::normalize;
use bulkload::document::converter::OperationConverter;
use bulkload::document::converter::csv::CsvOperationConverter;
use bulkload::document::field_value::FieldValue;
use bulkload::error::BulkloadError;
use bulkload::transform::RowTransformer;
use bulkload::transform::extension::ExtensionSet;
use tempfile::NamedTempFile;

/// A reader that records when it is dropped.
struct TrackedReader<R> {
    inner: R,
    closed: Rc<Cell<bool>>,
}

impl<R: Read> Read for TrackedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R> Drop for TrackedReader<R> {
    fn drop(&mut self) {
        self.closed.set(true);
    }
}

fn tracked(data: &'static str) -> (TrackedReader<&'static [u8]>, Rc<Cell<bool>>) {
    let closed = Rc::new(Cell::new(false));
    let reader = TrackedReader {
        inner: data.as_bytes(),
        closed: Rc::clone(&closed),
    };
    (reader, closed)
}

const TICKETS: &str = "\
Ticket No,Name,Work Title,Job Desc
10002,Zhang Gavin,supervisor,aaaa_
10003,Li Wei,engineer,bbbb
10004,Wang Fang,analyst,cccc
";

fn user_converter() -> CsvOperationConverter {
    CsvOperationConverter::new(RowTransformer::new("qd", "user").with_id_field_index(Some(0)))
}

#[test]
fn test_ticket_file_end_to_end() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(TICKETS.as_bytes()).unwrap();

    // The ticket doc type would enable the ticket extension, which needs
    // create/close columns this export does not have.
    let converter = CsvOperationConverter::new(
        RowTransformer::new("qd", "ticket")
            .with_id_field_index(Some(0))
            .with_extensions(ExtensionSet::new()),
    );
    let mut stream = converter.convert(file.path()).unwrap();

    assert_eq!(
        stream.fields().as_slice(),
        &["ticket_no", "name", "work_title", "job_desc"]
    );

    let op = stream.next().unwrap().unwrap();
    assert_eq!(op.id(), Some("10002"));
    assert_eq!(op.doc_type(), "ticket");
    assert_eq!(
        op.source().get_field("name").unwrap().as_text(),
        Some("Zhang Gavin")
    );
    assert_eq!(stream.count(), 2);
}

#[test]
fn test_abandoned_stream_closes_reader() {
    let (reader, closed) = tracked(TICKETS);
    let mut stream = user_converter().convert_reader(reader).unwrap();

    assert!(stream.next().unwrap().is_ok());
    assert!(!closed.get());

    drop(stream);
    assert!(closed.get());
}

#[test]
fn test_exhausted_stream_releases_reader() {
    let (reader, closed) = tracked(TICKETS);
    let mut stream = user_converter().convert_reader(reader).unwrap();

    assert_eq!(stream.by_ref().filter(|op| op.is_ok()).count(), 3);
    assert!(closed.get());
    assert!(stream.is_finished());
    assert_eq!(stream.emitted(), 3);
}

#[test]
fn test_failed_stream_releases_reader() {
    let (reader, closed) = tracked(TICKETS);
    let converter = CsvOperationConverter::new(RowTransformer::new("qd", "ticket"));
    let mut stream = converter.convert_reader(reader).unwrap();

    assert!(matches!(stream.next(), Some(Err(BulkloadError::Field(_)))));
    assert!(closed.get());
    assert!(stream.next().is_none());
}

#[test]
fn test_header_error_releases_reader() {
    let (reader, closed) = tracked("123,456\n1,2\n");
    let result = user_converter().convert_reader(reader);

    assert!(matches!(result, Err(BulkloadError::Header(_))));
    assert!(closed.get());
}

#[test]
fn test_missing_file_fails_at_open() {
    let result = user_converter().convert("/nonexistent/tickets.csv");
    assert!(matches!(result, Err(BulkloadError::Io(_))));
}

#[test]
fn test_ticket_extension_from_file() {
    let data = "\
Ticket No,Create Time,Close Time,Handle Time
1,1/17/2016 03:30:15 AM,1/17/2016 03:31:45 AM,00:01:30
2,1/17/2016 03:30:15 AM,1/17/2016 03:31:45 PM,12:01:30
3,not a date,1/17/2016 03:31:45 PM,
";
    let converter = CsvOperationConverter::new(RowTransformer::new("qd", "bf_ticket"));
    let ops: Vec<_> = converter
        .convert_reader(data.as_bytes())
        .unwrap()
        .map(|op| op.unwrap())
        .collect();

    let elapsed: Vec<_> = ops
        .iter()
        .map(|op| op.source().get_field("ticket_time").cloned())
        .collect();
    assert_eq!(
        elapsed,
        vec![
            Some(FieldValue::Integer(1)),
            Some(FieldValue::Integer(721)),
            Some(FieldValue::Integer(0)),
        ]
    );

    assert_eq!(
        ops[1].source().get_field("handle_time"),
        Some(&FieldValue::Integer(721))
    );
    assert!(ops[2].source().get_field("handle_time").unwrap().is_empty_text());
}

#[test]
fn test_every_field_name_is_normalized() {
    let data = "  Customer ID ,E-mail Address,Phone #,Notes (internal)\na,b,c,d\n";
    let converter = CsvOperationConverter::new(RowTransformer::new("crm", "contact"));
    let stream = converter.convert_reader(data.as_bytes()).unwrap();

    for name in stream.fields().iter() {
        assert_eq!(normalize(name), name);
    }
    assert_eq!(
        stream.fields().as_slice(),
        &["customer_id", "e_mail_address", "phone", "notes_internal"]
    );
}
