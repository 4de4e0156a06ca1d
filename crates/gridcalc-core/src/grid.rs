//! Sparse cell grid

use crate::cell::{Cell, CellError, CellRange, Coordinate, Value};
use crate::error::Result;
use ahash::AHashMap;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Read access to cells by coordinate
///
/// This is the seam between the formula engine and whatever owns the cells. The engine
/// only ever reads through it.
pub trait CellLookup {
    /// Get the cell at a coordinate, if one exists
    fn cell_at(&self, at: Coordinate) -> Option<&Cell>;
}

impl<S: BuildHasher> CellLookup for HashMap<Coordinate, Cell, S> {
    fn cell_at(&self, at: Coordinate) -> Option<&Cell> {
        self.get(&at)
    }
}

/// A sparse grid of cells keyed by coordinate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    cells: AHashMap<Coordinate, Cell>,
}

impl Grid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cell at an A1 address
    pub fn cell(&self, address: &str) -> Result<Option<&Cell>> {
        let at = Coordinate::parse(address)?;
        Ok(self.cells.get(&at))
    }

    /// Get the cell at a coordinate
    pub fn get(&self, at: Coordinate) -> Option<&Cell> {
        self.cells.get(&at)
    }

    /// Get a mutable cell at a coordinate
    pub fn get_mut(&mut self, at: Coordinate) -> Option<&mut Cell> {
        self.cells.get_mut(&at)
    }

    /// Set a literal value at an A1 address
    pub fn set_value<V: Into<Value>>(&mut self, address: &str, value: V) -> Result<()> {
        let at = Coordinate::parse(address)?;
        self.set_value_at(at, value);
        Ok(())
    }

    /// Set a literal value at a coordinate
    pub fn set_value_at<V: Into<Value>>(&mut self, at: Coordinate, value: V) {
        self.cells.insert(at, Cell::with_value(value));
    }

    /// Set formula text at an A1 address
    pub fn set_formula(&mut self, address: &str, formula: &str) -> Result<()> {
        let at = Coordinate::parse(address)?;
        self.set_formula_at(at, formula);
        Ok(())
    }

    /// Set formula text at a coordinate
    pub fn set_formula_at(&mut self, at: Coordinate, formula: &str) {
        self.cells.insert(at, Cell::with_formula(formula));
    }

    /// Mark the cell at a coordinate as failed, keeping any formula text
    pub fn set_error_at(&mut self, at: Coordinate, error: CellError) {
        self.cells
            .entry(at)
            .or_default()
            .set_failed(error);
    }

    /// Store a computed value on the cell at a coordinate, keeping any formula text
    pub fn set_computed_at(&mut self, at: Coordinate, value: Value) {
        self.cells.entry(at).or_default().set_computed(value);
    }

    /// Remove the cell at an A1 address
    pub fn clear(&mut self, address: &str) -> Result<()> {
        let at = Coordinate::parse(address)?;
        self.cells.remove(&at);
        Ok(())
    }

    /// Number of stored cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Coordinates of every stored cell, in row-major order
    pub fn coordinates(&self) -> Vec<Coordinate> {
        let mut coords: Vec<Coordinate> = self.cells.keys().copied().collect();
        coords.sort();
        coords
    }

    /// Coordinates of every formula cell, in row-major order
    pub fn formula_cells(&self) -> Vec<Coordinate> {
        let mut coords: Vec<Coordinate> = self
            .cells
            .iter()
            .filter(|(_, cell)| cell.is_formula())
            .map(|(at, _)| *at)
            .collect();
        coords.sort();
        coords
    }

    /// Smallest range covering every stored cell
    pub fn used_range(&self) -> Option<CellRange> {
        let mut keys = self.cells.keys();
        let first = *keys.next()?;
        let (mut top, mut left, mut bottom, mut right) = (first.row, first.col, first.row, first.col);
        for at in keys {
            top = top.min(at.row);
            left = left.min(at.col);
            bottom = bottom.max(at.row);
            right = right.max(at.col);
        }
        Some(CellRange::new(
            Coordinate::new(top, left),
            Coordinate::new(bottom, right),
        ))
    }
}

impl CellLookup for Grid {
    fn cell_at(&self, at: Coordinate) -> Option<&Cell> {
        self.cells.get(&at)
    }
}
