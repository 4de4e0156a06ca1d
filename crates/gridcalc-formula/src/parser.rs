//! Formula parser
//!
//! Operands are parsed by recursive descent; runs of binary operators are ordered with a
//! two-stack (shunting-yard) pass into postfix and then folded into a tree.
//!
//! ```text
//! formula      := expression <end>
//! expression   := operand (binaryOp operand)*
//! operand      := functionCall | negative | '(' expression ')' | term
//! term         := NUMBER | STRING | CELL | CELL ':' CELL
//! functionCall := IDENTIFIER '(' (expression (',' expression)*)? ')'
//! negative     := '-' expression
//! ```
//!
//! `negative` wraps the entire following expression, so `-2+3` is `-(2+3)`.

use crate::ast::{BinaryOperator, Expr};
use crate::error::{FormulaError, FormulaResult};
use crate::lexer::lex;
use crate::token::{Token, TokenKind};
use gridcalc_core::Coordinate;

/// Parse formula text into an AST
///
/// A single leading `=` (the cell-entry trigger) is accepted and ignored.
///
/// # Example
/// ```rust
/// use gridcalc_formula::parse_formula;
///
/// let ast = parse_formula("=1+2").unwrap();
/// let ast = parse_formula("SUM(A1:A10)").unwrap();
/// assert!(parse_formula("1+").is_err());
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<Expr> {
    let trimmed = formula.trim_start();
    let source = trimmed.strip_prefix('=').unwrap_or(trimmed);
    let tokens = lex(source)?;
    parse(&tokens)
}

/// Deepest expression tree the parser builds, and deepest parenthesis, negation or
/// argument nesting it descends into
pub const MAX_DEPTH: usize = 256;

/// Parse an already-lexed token sequence into an AST
pub fn parse(tokens: &[Token]) -> FormulaResult<Expr> {
    let mut parser = FormulaParser::new(tokens);
    let (expr, _) = parser.parse_expression()?;

    // Make sure we consumed all input
    if let Some(token) = parser.peek(0) {
        return Err(FormulaParser::unexpected("end of input", token));
    }

    Ok(expr)
}

/// A parsed subtree and its height
type Node = (Expr, usize);

/// One entry of the postfix list built while ordering operators
enum Postfix {
    Operand(Node),
    Operator(BinaryOperator),
}

fn deeper(depth: usize) -> FormulaResult<usize> {
    if depth >= MAX_DEPTH {
        return Err(FormulaError::NestingTooDeep { limit: MAX_DEPTH });
    }
    Ok(depth + 1)
}

/// Formula parser: an index cursor over an immutable token slice
struct FormulaParser<'t> {
    tokens: &'t [Token],
    pos: usize,
    nesting: usize,
}

impl<'t> FormulaParser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            nesting: 0,
        }
    }

    // === Cursor primitives ===

    fn peek(&self, offset: usize) -> Option<&'t Token> {
        self.tokens.get(self.pos + offset)
    }

    fn is_next_value(&self, offset: usize, values: &[&str]) -> bool {
        self.peek(offset)
            .is_some_and(|t| values.contains(&t.value.as_str()))
    }

    fn is_next_type(&self, offset: usize, kind: TokenKind) -> bool {
        self.peek(offset).is_some_and(|t| t.kind == kind)
    }

    fn consume(&mut self) -> FormulaResult<&'t Token> {
        let token = self.peek(0).ok_or(FormulaError::UnexpectedEndOfInput)?;
        self.pos += 1;
        Ok(token)
    }

    /// Consume the next token, requiring one of the given texts
    fn consume_value(&mut self, expected: &[&str]) -> FormulaResult<&'t Token> {
        let token = self.consume()?;
        if expected.contains(&token.value.as_str()) {
            Ok(token)
        } else {
            let wanted = expected
                .iter()
                .map(|v| format!("'{}'", v))
                .collect::<Vec<_>>()
                .join(" or ");
            Err(Self::unexpected(&wanted, token))
        }
    }

    /// Consume the next token, requiring the given kind
    fn consume_type(&mut self, kind: TokenKind) -> FormulaResult<&'t Token> {
        let token = self.consume()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(Self::unexpected(&kind.to_string(), token))
        }
    }

    fn unexpected(expected: &str, found: &Token) -> FormulaError {
        FormulaError::UnexpectedToken {
            expected: expected.to_string(),
            found: found.value.clone(),
            position: found.position,
        }
    }

    // === Expressions ===

    fn parse_expression(&mut self) -> FormulaResult<Node> {
        self.nesting = deeper(self.nesting)?;

        let mut output = vec![Postfix::Operand(self.parse_operand()?)];
        let mut operators: Vec<BinaryOperator> = Vec::new();

        while self.is_next_type(0, TokenKind::Operator) {
            let token = self.consume()?;
            let op = BinaryOperator::from_symbol(&token.value)
                .ok_or_else(|| Self::unexpected("binary operator", token))?;

            // >= pops equal precedence first, which makes operators left-associative.
            while let Some(top) = operators.last().copied() {
                if top.precedence() < op.precedence() {
                    break;
                }
                operators.pop();
                output.push(Postfix::Operator(top));
            }
            operators.push(op);

            output.push(Postfix::Operand(self.parse_operand()?));
        }

        while let Some(op) = operators.pop() {
            output.push(Postfix::Operator(op));
        }

        let node = Self::reduce(output)?;
        self.nesting -= 1;
        Ok(node)
    }

    /// Fold a postfix list into a tree
    ///
    /// Each operator takes the two most recent operands, right one first. An operand
    /// stack keeps long operator runs from recursing.
    fn reduce(output: Vec<Postfix>) -> FormulaResult<Node> {
        let mut operands: Vec<Node> = Vec::with_capacity(output.len() / 2 + 1);

        for item in output {
            match item {
                Postfix::Operand(node) => operands.push(node),
                Postfix::Operator(op) => {
                    let (right, right_depth) =
                        operands.pop().ok_or(FormulaError::MalformedExpression)?;
                    let (left, left_depth) =
                        operands.pop().ok_or(FormulaError::MalformedExpression)?;
                    let depth = deeper(left_depth.max(right_depth))?;
                    operands.push((
                        Expr::BinaryOp {
                            op,
                            left: Box::new(left),
                            right: Box::new(right),
                        },
                        depth,
                    ));
                }
            }
        }

        let node = operands.pop().ok_or(FormulaError::MalformedExpression)?;
        if !operands.is_empty() {
            return Err(FormulaError::MalformedExpression);
        }
        Ok(node)
    }

    fn parse_operand(&mut self) -> FormulaResult<Node> {
        if self.is_next_type(0, TokenKind::Identifier) {
            return self.parse_function_call();
        }

        if self.is_next_type(0, TokenKind::Operator) && self.is_next_value(0, &["-"]) {
            self.consume()?;
            let (operand, depth) = self.parse_expression()?;
            return Ok((Expr::Negation(Box::new(operand)), deeper(depth)?));
        }

        if self.is_next_type(0, TokenKind::Punctuation) && self.is_next_value(0, &["("]) {
            self.consume()?;
            let node = self.parse_expression()?;
            self.consume_value(&[")"])?;
            return Ok(node);
        }

        Ok((self.parse_term()?, 1))
    }

    fn parse_term(&mut self) -> FormulaResult<Expr> {
        let token = self.consume()?;

        match token.kind {
            TokenKind::NumberLiteral => {
                let n: f64 = token
                    .value
                    .parse()
                    .map_err(|_| Self::unexpected("number", token))?;
                Ok(Expr::NumberLiteral(n))
            }
            TokenKind::StringLiteral => {
                let inner = token
                    .value
                    .strip_prefix('"')
                    .and_then(|s| s.strip_suffix('"'))
                    .ok_or_else(|| Self::unexpected("string", token))?;
                Ok(Expr::StringLiteral(inner.to_string()))
            }
            TokenKind::CellLiteral => {
                let start = Coordinate::parse(&token.value)?;

                if self.is_next_value(0, &[":"]) && self.is_next_type(0, TokenKind::Punctuation) {
                    self.consume()?;
                    let end_token = self.consume_type(TokenKind::CellLiteral)?;
                    let end = Coordinate::parse(&end_token.value)?;
                    return Ok(Expr::CellRange { start, end });
                }

                Ok(Expr::CellRef(start))
            }
            _ => Err(Self::unexpected("operand", token)),
        }
    }

    fn parse_function_call(&mut self) -> FormulaResult<Node> {
        let name = self.consume_type(TokenKind::Identifier)?.value.clone();
        self.consume_value(&["("])?;

        let mut args = Vec::new();
        let mut depth = 0;

        if !self.is_next_value(0, &[")"]) {
            let (arg, arg_depth) = self.parse_expression()?;
            args.push(arg);
            depth = arg_depth;

            while self.is_next_value(0, &[","]) {
                self.consume()?;
                let (arg, arg_depth) = self.parse_expression()?;
                args.push(arg);
                depth = depth.max(arg_depth);
            }
        }

        self.consume_value(&[")"])?;

        Ok((Expr::FunctionCall { name, args }, deeper(depth)?))
    }
}
