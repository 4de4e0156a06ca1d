//! # gridcalc-formula
//!
//! Formula engine for gridcalc.
//!
//! This crate provides:
//! - Lexing (text → tokens) and parsing (tokens → AST)
//! - Evaluation of an AST against a grid snapshot and a function registry
//! - Cell resolution with cycle detection and a per-evaluation cache
//! - A small standard function library
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_core::{Grid, Value};
//! use gridcalc_formula::{evaluate, parse_formula, EvaluationContext, FunctionRegistry};
//!
//! let mut grid = Grid::new();
//! grid.set_value("A1", 1.0).unwrap();
//! grid.set_value("A2", 2.0).unwrap();
//! grid.set_formula("A3", "=A1+A2").unwrap();
//!
//! let functions = FunctionRegistry::standard();
//! let ctx = EvaluationContext::new(&grid, &functions);
//!
//! let ast = parse_formula("=SUM(A1:A3)").unwrap();
//! assert_eq!(evaluate(&ast, &ctx).unwrap(), Value::Number(6.0));
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{BinaryOperator, Expr, NodeKind};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{
    evaluate, evaluate_cell_at, evaluate_formula, EvaluationContext, EvaluationOptions, Evaluator,
    MAX_EVALUATION_DEPTH,
};
pub use functions::{FunctionDef, FunctionRegistry};
pub use lexer::lex;
pub use parser::{parse, parse_formula, MAX_DEPTH};
pub use token::{Token, TokenKind};
