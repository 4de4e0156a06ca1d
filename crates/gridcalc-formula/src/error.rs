//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors raised while lexing, parsing or evaluating a formula
///
/// Every fault is raised where it is detected and unwinds to the caller of
/// `evaluate`/`evaluate_cell_at`; nothing is defaulted along the way.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Address text outside the supported shape
    #[error(transparent)]
    MalformedAddress(#[from] gridcalc_core::Error),

    /// Unrecognized character in the source
    #[error("Unexpected character '{character}' at position {position}")]
    Lex { character: char, position: usize },

    /// String literal without a closing quote
    #[error("Unterminated string literal starting at position {position}")]
    UnterminatedString { position: usize },

    /// Ran out of tokens mid-parse
    #[error("Unexpected end of input")]
    UnexpectedEndOfInput,

    /// A token other than the one the grammar requires
    #[error("Expected {expected}, found '{found}' at position {position}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: usize,
    },

    /// Postfix reduction ran out of operands
    #[error("Malformed expression")]
    MalformedExpression,

    /// Function name not present in the registry
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Arithmetic or negation operand that is not a number
    #[error("Operator {operator} expects a number, got {value}")]
    NonNumericOperand { operator: String, value: String },

    /// Right operand of `/` is zero
    #[error("Division by zero")]
    DivisionByZero,

    /// A referenced cell (directly or as a range member) carries an error
    #[error("Cell {address} has an error: {cause}")]
    DependentCell { address: String, cause: String },

    /// Formula or reference chain nested deeper than the engine allows
    #[error("Nesting exceeds the limit of {limit} levels")]
    NestingTooDeep { limit: usize },

    /// A cell was reached again while it was still being resolved
    #[error("Circular reference detected involving cell {address}")]
    CircularReference { address: String },

    /// Failure reported by a registered function
    #[error("{function}: {message}")]
    Function { function: String, message: String },
}

impl FormulaError {
    /// Failure raised from inside a function implementation
    pub fn function<F: Into<String>, M: Into<String>>(function: F, message: M) -> Self {
        FormulaError::Function {
            function: function.into(),
            message: message.into(),
        }
    }
}
