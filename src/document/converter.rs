//! Converters from input files to index operations.
//!
//! A converter reads the header once, then yields one
//! [`IndexOperation`](crate::document::operation::IndexOperation) per record,
//! lazily, while the caller pulls.
//!
//! # Example
//!
//! ```no_run
//! use bulkload::document::converter::OperationConverter;
//! use bulkload::document::converter::csv::CsvOperationConverter;
//! use bulkload::transform::RowTransformer;
//!
//! let converter = CsvOperationConverter::new(RowTransformer::new("qd", "ticket"));
//! for op in converter.convert("tickets.csv").unwrap() {
//!     let op = op.unwrap();
//!     println!("{:?}", op.id());
//! }
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::document::operation::IndexOperation;
use crate::error::Result;

pub mod csv;

/// A trait for converting input files into operation iterators.
pub trait OperationConverter {
    /// The iterator type that yields operations.
    type Iter: Iterator<Item = Result<IndexOperation>>;

    /// Open `path` and return an iterator of operations.
    ///
    /// Errors opening the file or reading its header are returned here,
    /// before any operation is produced.
    fn convert<P: AsRef<Path>>(&self, path: P) -> Result<Self::Iter>;
}

/// Where the delimited data comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputSource {
    /// Standard input (`-` on the command line).
    Stdin,
    /// A file on disk.
    File(PathBuf),
}

impl InputSource {
    /// Interpret a command line argument; `-` means standard input.
    pub fn from_arg<P: AsRef<Path>>(arg: P) -> Self {
        let path = arg.as_ref();
        if path == Path::new("-") {
            InputSource::Stdin
        } else {
            InputSource::File(path.to_path_buf())
        }
    }

    /// Open the source for reading.
    pub fn open(&self) -> Result<Box<dyn Read>> {
        match self {
            InputSource::Stdin => Ok(Box::new(io::stdin())),
            InputSource::File(path) => {
                let file = File::open(path).map_err(|e| {
                    io::Error::new(e.kind(), format!("cannot open {}: {e}", path.display()))
                })?;
                Ok(Box::new(file))
            }
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Stdin => write!(f, "<stdin>"),
            InputSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}
