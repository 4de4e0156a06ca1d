//! # gridcalc
//!
//! A small spreadsheet formula engine.
//!
//! - A1 addresses and ranges ([`Coordinate`], [`CellRange`])
//! - Formula lexing, parsing and evaluation against a sparse [`Grid`]
//! - Cycle detection and a per-evaluation cell cache
//! - A calculation pass that fills every formula cell with its value or error
//! - CSV grid files
//!
//! ## Example
//!
//! ```rust
//! use gridcalc::prelude::*;
//!
//! let mut grid = Grid::new();
//! grid.set_value("A1", 10.0).unwrap();
//! grid.set_value("A2", 20.0).unwrap();
//! grid.set_formula("A3", "=A1+A2").unwrap();
//! grid.set_formula("A4", "=A3/0").unwrap();
//!
//! let stats = grid.calculate().unwrap();
//! assert_eq!(stats.cells_calculated, 1);
//! assert_eq!(stats.errors, 1);
//!
//! let a3 = grid.cell("A3").unwrap().unwrap();
//! assert_eq!(a3.value(), Some(&Value::Number(30.0)));
//! ```

pub mod calculation;
pub mod error;
pub mod prelude;

pub use calculation::{calculate, CalculationOptions, CalculationStats, GridCalculationExt};
pub use error::{Error, Result};

// Re-export core types
pub use gridcalc_core::{
    coords_in_range, format_number, Cell, CellError, CellLookup, CellRange, Coordinate, Grid,
    Value,
};

// Re-export formula types
pub use gridcalc_formula::{
    evaluate, evaluate_cell_at, evaluate_formula, lex, parse, parse_formula, BinaryOperator,
    EvaluationContext, EvaluationOptions, Evaluator, Expr, FormulaError, FormulaResult,
    FunctionDef, FunctionRegistry, Token, TokenKind, MAX_DEPTH, MAX_EVALUATION_DEPTH,
};

// Re-export I/O types
pub use gridcalc_csv::{
    CsvError, CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter, LineTerminator,
};

use std::path::Path;

/// Extension trait for Grid to add CSV file I/O
pub trait GridExt: Sized {
    /// Open a grid from a CSV file
    fn open<P: AsRef<Path>>(path: P) -> Result<Self>;

    /// Save the grid to a CSV file
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>;
}

impl GridExt for Grid {
    fn open<P: AsRef<Path>>(path: P) -> Result<Grid> {
        Ok(CsvReader::read_file(path, &CsvReadOptions::default())?)
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        Ok(CsvWriter::write_file(self, path, &CsvWriteOptions::default())?)
    }
}
