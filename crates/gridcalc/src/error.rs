//! Error types for the gridcalc facade

use thiserror::Error;

/// Errors raised by grid calculation and grid file I/O
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid A1 address or range
    #[error(transparent)]
    Address(#[from] gridcalc_core::Error),

    /// Formula fault that aborted a calculation pass
    #[error(transparent)]
    Formula(#[from] gridcalc_formula::FormulaError),

    /// CSV read/write failure
    #[error(transparent)]
    Csv(#[from] gridcalc_csv::CsvError),
}

/// Result type alias for the facade
pub type Result<T> = std::result::Result<T, Error>;
