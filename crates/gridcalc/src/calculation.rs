//! Grid calculation pass
//!
//! Evaluates every formula cell of a grid and stores the outcome back on the cell: a value
//! on success, a [`CellError`] otherwise. Cells are visited in row-major order through one
//! shared [`Evaluator`], so with caching enabled each cell is evaluated at most once per pass
//! no matter how many formulas read it.
//!
//! # Example
//!
//! ```rust
//! use gridcalc::prelude::*;
//!
//! let mut grid = Grid::new();
//! grid.set_formula("A1", "=B1+1").unwrap();
//! grid.set_formula("B1", "=A1+1").unwrap();
//! grid.set_formula("C1", "=2*3").unwrap();
//!
//! let stats = grid.calculate().unwrap();
//! assert_eq!(stats.circular_references, 2);
//! assert_eq!(stats.cells_calculated, 1);
//! ```

use crate::{
    parse_formula, Cell, CellError, Coordinate, Error, EvaluationContext, EvaluationOptions,
    Evaluator, FormulaError, FunctionRegistry, Grid, Result, Value,
};
use tracing::{debug, enabled, trace, warn, Level};

/// Options for a calculation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalculationOptions {
    /// Options handed to the evaluator
    pub evaluation: EvaluationOptions,
    /// Abort the pass on the first circular reference instead of recording it on the cell
    pub stop_on_cycle: bool,
}

/// Statistics from a calculation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculationStats {
    /// Total number of formula cells
    pub formula_count: usize,
    /// Number of formula cells that produced a value
    pub cells_calculated: usize,
    /// Number of formula cells left in error, circular ones excluded
    pub errors: usize,
    /// Number of formula cells whose resolution ran into a cycle
    pub circular_references: usize,
}

/// Extension trait for Grid to add calculation methods
pub trait GridCalculationExt {
    /// Calculate all formulas with the standard function library and default options
    fn calculate(&mut self) -> Result<CalculationStats>;

    /// Calculate all formulas with a custom registry and options
    fn calculate_with(
        &mut self,
        functions: &FunctionRegistry,
        options: &CalculationOptions,
    ) -> Result<CalculationStats>;
}

impl GridCalculationExt for Grid {
    fn calculate(&mut self) -> Result<CalculationStats> {
        let functions = FunctionRegistry::standard();
        calculate(self, &functions, &CalculationOptions::default())
    }

    fn calculate_with(
        &mut self,
        functions: &FunctionRegistry,
        options: &CalculationOptions,
    ) -> Result<CalculationStats> {
        calculate(self, functions, options)
    }
}

/// Evaluate every formula cell in the grid and store the results
///
/// The grid is left untouched when the pass is aborted by `stop_on_cycle`.
pub fn calculate(
    grid: &mut Grid,
    functions: &FunctionRegistry,
    options: &CalculationOptions,
) -> Result<CalculationStats> {
    let formula_cells = grid.formula_cells();
    let mut stats = CalculationStats {
        formula_count: formula_cells.len(),
        ..Default::default()
    };

    if formula_cells.is_empty() {
        return Ok(stats);
    }

    debug!(formulas = stats.formula_count, "starting calculation pass");

    // Phase 1: evaluate against the grid as it stands
    let outcomes = {
        let ctx = EvaluationContext::new(&*grid, functions).with_options(options.evaluation);
        let evaluator = Evaluator::new(&ctx);
        let mut outcomes = Vec::with_capacity(formula_cells.len());

        for at in formula_cells {
            if enabled!(Level::TRACE) {
                trace_precedents(grid, at);
            }

            let outcome = match evaluator.resolve_cell(at) {
                Ok(cell) => {
                    let outcome = cell_outcome(cell);
                    if outcome.is_err() {
                        stats.errors += 1;
                    }
                    outcome
                }
                Err(e @ FormulaError::CircularReference { .. }) => {
                    if options.stop_on_cycle {
                        return Err(Error::Formula(e));
                    }
                    stats.circular_references += 1;
                    Err(CellError::new(e.to_string()))
                }
                Err(e) => {
                    stats.errors += 1;
                    Err(CellError::new(e.to_string()))
                }
            };
            outcomes.push((at, outcome));
        }
        outcomes
    };

    // Phase 2: write back
    for (at, outcome) in outcomes {
        match outcome {
            Ok(value) => {
                stats.cells_calculated += 1;
                grid.set_computed_at(at, value);
            }
            Err(error) => {
                warn!(cell = %at, error = %error, "formula cell left in error");
                grid.set_error_at(at, error);
            }
        }
    }

    debug!(
        calculated = stats.cells_calculated,
        errors = stats.errors,
        circular = stats.circular_references,
        "calculation pass finished"
    );
    Ok(stats)
}

/// Turn a resolved formula cell into the value or error to store
fn cell_outcome(cell: Option<Cell>) -> std::result::Result<Value, CellError> {
    match cell {
        Some(cell) => match cell.error() {
            Some(error) => Err(error.clone()),
            None => Ok(cell.value().cloned().unwrap_or_default()),
        },
        None => Ok(Value::Empty),
    }
}

fn trace_precedents(grid: &Grid, at: Coordinate) {
    let Some(formula) = grid.get(at).and_then(Cell::formula) else {
        return;
    };
    if let Ok(ast) = parse_formula(formula) {
        let precedents: Vec<String> = ast.references().iter().map(ToString::to_string).collect();
        trace!(cell = %at, precedents = ?precedents, "formula precedents");
    }
}
