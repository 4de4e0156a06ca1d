//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::options::CsvReadOptions;
use gridcalc_core::{Coordinate, Grid, Value};

/// CSV grid reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a grid
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Grid> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read CSV from a reader into a grid
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Grid> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut grid = Grid::new();

        for (row, result) in csv_reader.records().enumerate() {
            let record = result?;

            for (column, field) in record.iter().enumerate() {
                let field = if options.trim { field.trim() } else { field };
                if field.is_empty() {
                    continue;
                }

                let at = Self::coordinate(row, column)?;
                if field.starts_with('=') {
                    grid.set_formula_at(at, field);
                } else {
                    grid.set_value_at(at, Self::detect_type(field));
                }
            }
        }

        Ok(grid)
    }

    fn coordinate(row: usize, column: usize) -> CsvResult<Coordinate> {
        match (u32::try_from(row), u32::try_from(column)) {
            (Ok(r), Ok(c)) => Ok(Coordinate::new(r, c)),
            _ => Err(CsvError::OutOfRange { row, column }),
        }
    }

    /// Detect the type of a field value
    fn detect_type(field: &str) -> Value {
        match field.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::text(field),
        }
    }
}
