//! Formula Abstract Syntax Tree types

use crate::error::FormulaResult;
use crate::evaluator::{self, EvaluationContext};
use ahash::AHashSet;
use gridcalc_core::{format_number, CellRange, Coordinate, Value};
use std::fmt;

/// Formula expression AST
///
/// A tree is immutable once built; evaluation only reads it.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // === Literals ===
    /// Text literal, quotes already stripped
    StringLiteral(String),
    /// Numeric literal
    NumberLiteral(f64),

    // === References ===
    /// Single cell reference
    CellRef(Coordinate),
    /// Range reference, corners as written
    CellRange { start: Coordinate, end: Coordinate },

    // === Operators ===
    /// Unary minus applied to a whole expression
    Negation(Box<Expr>),
    /// Binary arithmetic
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    // === Function call ===
    FunctionCall { name: String, args: Vec<Expr> },
}

/// Variant tag of an [`Expr`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    String,
    Number,
    Cell,
    CellRange,
    Negative,
    FunctionCall,
    BinaryOperator(BinaryOperator),
}

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    /// Map an operator token to its operator
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(BinaryOperator::Add),
            "-" => Some(BinaryOperator::Subtract),
            "*" => Some(BinaryOperator::Multiply),
            "/" => Some(BinaryOperator::Divide),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
        }
    }

    /// Binding strength; higher binds tighter
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOperator::Multiply | BinaryOperator::Divide => 2,
            BinaryOperator::Add | BinaryOperator::Subtract => 1,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Expr {
    /// Evaluate this tree against a context
    pub fn evaluate(&self, ctx: &EvaluationContext) -> FormulaResult<Value> {
        evaluator::evaluate(self, ctx)
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Expr::StringLiteral(_) => NodeKind::String,
            Expr::NumberLiteral(_) => NodeKind::Number,
            Expr::CellRef(_) => NodeKind::Cell,
            Expr::CellRange { .. } => NodeKind::CellRange,
            Expr::Negation(_) => NodeKind::Negative,
            Expr::FunctionCall { .. } => NodeKind::FunctionCall,
            Expr::BinaryOp { op, .. } => NodeKind::BinaryOperator(*op),
        }
    }

    /// Direct child nodes, in evaluation order
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Negation(operand) => vec![operand.as_ref()],
            Expr::BinaryOp { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Expr::FunctionCall { args, .. } => args.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Every coordinate this formula reads, ranges expanded, first occurrence order
    pub fn references(&self) -> Vec<Coordinate> {
        let mut seen = AHashSet::new();
        let mut out = Vec::new();
        self.for_each_reference(&mut |at| {
            if seen.insert(at) {
                out.push(at);
            }
        });
        out
    }

    /// Visit every coordinate this formula reads in evaluation order, walking ranges
    /// lazily and without deduplication
    pub fn for_each_reference<F: FnMut(Coordinate)>(&self, visit: &mut F) {
        match self {
            Expr::CellRef(at) => visit(*at),
            Expr::CellRange { start, end } => {
                CellRange::new(*start, *end).cells().for_each(|at| visit(at))
            }
            Expr::Negation(operand) => operand.for_each_reference(visit),
            Expr::BinaryOp { left, right, .. } => {
                left.for_each_reference(visit);
                right.for_each_reference(visit);
            }
            Expr::FunctionCall { args, .. } => {
                args.iter().for_each(|arg| arg.for_each_reference(visit))
            }
            Expr::StringLiteral(_) | Expr::NumberLiteral(_) => {}
        }
    }
}

/// Renders the tree as fully parenthesised formula text
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::StringLiteral(s) => write!(f, "\"{}\"", s),
            Expr::NumberLiteral(n) => write!(f, "{}", format_number(*n)),
            Expr::CellRef(at) => write!(f, "{}", at),
            Expr::CellRange { start, end } => write!(f, "{}:{}", start, end),
            Expr::Negation(operand) => write!(f, "-({})", operand),
            Expr::BinaryOp { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expr::FunctionCall { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}
