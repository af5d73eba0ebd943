//! Analysis of raw text from delimited files.
//!
//! - [`field_name`] - header normalization into field names
//! - [`time_value`] - duration and timestamp handling for row values

pub mod field_name;
pub mod time_value;
