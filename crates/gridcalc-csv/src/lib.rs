//! # gridcalc-csv
//!
//! Loads a [`Grid`](gridcalc_core::Grid) from CSV and writes one back out.
//!
//! Field `(i, j)` of the file is the cell at row `i`, column `j`. A field starting with `=`
//! is a formula, a field that parses as a number is a number, an empty field is no cell,
//! and anything else is text.

mod error;
mod options;
mod reader;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvReadOptions, CsvWriteOptions, LineTerminator};
pub use reader::CsvReader;
pub use writer::CsvWriter;
