//! Token definitions for the formula lexer

use std::fmt;

/// Lexical class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Digits with an optional decimal point
    NumberLiteral,
    /// Double-quoted text; the value keeps its quotes
    StringLiteral,
    /// Letters immediately followed by digits (`B3`)
    CellLiteral,
    /// Letters not followed by digits (function names)
    Identifier,
    /// `+ - * /`
    Operator,
    /// `, ( ) :`
    Punctuation,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::NumberLiteral => "number",
            TokenKind::StringLiteral => "string",
            TokenKind::CellLiteral => "cell reference",
            TokenKind::Identifier => "identifier",
            TokenKind::Operator => "operator",
            TokenKind::Punctuation => "punctuation",
        };
        f.write_str(name)
    }
}

/// A classified lexical unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    /// Byte offset of the first character in the source
    pub position: usize,
}

impl Token {
    pub fn new<S: Into<String>>(kind: TokenKind, value: S, position: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            position,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.value)
    }
}
