//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::{CsvWriteOptions, LineTerminator};
use gridcalc_core::{Coordinate, Grid};

/// CSV grid writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write a grid to a CSV file
    pub fn write_file<P: AsRef<Path>>(
        grid: &Grid,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(grid, file, options)
    }

    /// Write a grid to a writer, from A1 to the bottom-right used cell
    ///
    /// Each cell is written as its display form: the error, else the value, else the
    /// formula text.
    pub fn write<W: Write>(grid: &Grid, writer: W, options: &CsvWriteOptions) -> CsvResult<()> {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(terminator)
            .from_writer(writer);

        if let Some(range) = grid.used_range() {
            for row in 0..=range.end.row {
                let record: Vec<String> = (0..=range.end.col)
                    .map(|col| {
                        grid.get(Coordinate::new(row, col))
                            .map(ToString::to_string)
                            .unwrap_or_default()
                    })
                    .collect();

                csv_writer.write_record(&record)?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }
}
