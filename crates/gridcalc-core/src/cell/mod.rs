//! Cell-related types
//!
//! This module contains:
//! - [`Coordinate`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A range of cells (e.g., "A1:B10")
//! - [`Value`] - A computed or literal value
//! - [`Cell`] - A grid position's formula, value and error

mod address;
mod value;

pub use address::{coords_in_range, CellRange, CellRangeIter, Coordinate};
pub use value::{format_number, Value};

use std::fmt;

/// Fault marker stored on a cell whose formula failed to evaluate
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellError {
    message: String,
}

impl CellError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// One addressable grid position
///
/// A cell may hold a formula that has not been evaluated yet. After resolution exactly
/// one of `value` and `error` is meaningful; a cell with neither is empty.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    formula: Option<String>,
    value: Option<Value>,
    error: Option<CellError>,
}

impl Cell {
    /// A cell holding a literal value
    pub fn with_value<V: Into<Value>>(value: V) -> Self {
        Self {
            formula: None,
            value: Some(value.into()),
            error: None,
        }
    }

    /// A cell holding formula text that is evaluated on demand
    pub fn with_formula<S: Into<String>>(formula: S) -> Self {
        Self {
            formula: Some(formula.into()),
            value: None,
            error: None,
        }
    }

    /// A cell carrying a fault
    pub fn with_error(error: CellError) -> Self {
        Self {
            formula: None,
            value: None,
            error: Some(error),
        }
    }

    /// Formula text, if this cell is computed
    pub fn formula(&self) -> Option<&str> {
        self.formula.as_deref()
    }

    /// Settled value, if any
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Fault, if any
    pub fn error(&self) -> Option<&CellError> {
        self.error.as_ref()
    }

    pub fn is_formula(&self) -> bool {
        self.formula.is_some()
    }

    /// True if the cell has neither a value nor an error
    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.value.as_ref().map_or(true, Value::is_empty)
    }

    /// Record a successful evaluation, clearing any previous fault
    pub fn set_computed(&mut self, value: Value) {
        self.value = Some(value);
        self.error = None;
    }

    /// Record a failed evaluation, clearing any previous value
    pub fn set_failed(&mut self, error: CellError) {
        self.value = None;
        self.error = Some(error);
    }

    /// The result of resolving this cell's formula, keeping the formula text
    pub fn resolved(&self, result: std::result::Result<Value, CellError>) -> Self {
        let mut cell = Self {
            formula: self.formula.clone(),
            value: None,
            error: None,
        };
        match result {
            Ok(value) => cell.set_computed(value),
            Err(error) => cell.set_failed(error),
        }
        cell
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.error, &self.value, &self.formula) {
            (Some(e), _, _) => write!(f, "#ERR: {}", e),
            (None, Some(v), _) => write!(f, "{}", v),
            (None, None, Some(text)) => write!(f, "{}", text),
            (None, None, None) => Ok(()),
        }
    }
}
