//! Prelude module - common imports for gridcalc users
//!
//! ```rust
//! use gridcalc::prelude::*;
//! ```

pub use crate::{
    // Calculation types
    CalculationOptions,
    CalculationStats,
    // Cell types
    Cell,
    CellError,
    CellRange,
    Coordinate,

    CsvReader,
    CsvWriter,

    // Error types
    Error,
    EvaluationContext,
    EvaluationOptions,
    FormulaError,
    FunctionRegistry,
    // Main types
    Grid,
    // Extension traits
    GridCalculationExt,
    GridExt,
    Result,
    Value,
};
