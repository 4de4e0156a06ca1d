//! # gridcalc-core
//!
//! Core data structures for the gridcalc formula engine.
//!
//! This crate provides the types shared by the parser, the evaluator and hosts:
//! - [`Coordinate`] and [`CellRange`] - A1 addressing and range enumeration
//! - [`Value`] - Numbers, text and sequences produced by formulas
//! - [`Cell`] - A grid position's formula, settled value or fault
//! - [`Grid`] and [`CellLookup`] - Cell storage and the read-only lookup seam
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_core::{Coordinate, Grid, Value};
//!
//! let mut grid = Grid::new();
//! grid.set_value("A1", 10.0).unwrap();
//! grid.set_formula("A2", "=A1*2").unwrap();
//!
//! let at = Coordinate::parse("A1").unwrap();
//! assert_eq!(grid.get(at).and_then(|c| c.value()), Some(&Value::Number(10.0)));
//! ```

pub mod cell;
pub mod error;
pub mod grid;

pub use cell::{
    coords_in_range, format_number, Cell, CellError, CellRange, CellRangeIter, Coordinate, Value,
};
pub use error::{Error, Result};
pub use grid::{CellLookup, Grid};
