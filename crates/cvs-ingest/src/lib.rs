#![deny(unsafe_code)]

pub mod csv_table;
pub mod error;
pub mod form;

pub use csv_table::{read_csv_from_reader, read_csv_table};
pub use error::{IngestError, Result};
pub use form::{FormEntry, form_from_assignments, parse_assignment};
