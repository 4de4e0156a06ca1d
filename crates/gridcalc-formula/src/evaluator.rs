//! Formula evaluator
//!
//! Evaluates formula ASTs against a grid and a function registry. Cell references are
//! resolved on demand. With caching on, a formula cell's precedents are first resolved
//! bottom-up from an explicit worklist, so a long dependency chain never turns into a
//! deep call stack. Without caching, nesting is bounded by [`MAX_EVALUATION_DEPTH`].

use crate::ast::{BinaryOperator, Expr};
use crate::error::{FormulaError, FormulaResult};
use crate::functions::FunctionRegistry;
use crate::parser::parse_formula;
use ahash::{AHashMap, AHashSet};
use gridcalc_core::{Cell, CellError, CellLookup, CellRange, Coordinate, Value};
use std::cell::RefCell;
use tracing::{debug, trace};

/// Maximum number of nested expression evaluations in one pass
pub const MAX_EVALUATION_DEPTH: usize = 512;

/// Options for a single evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationOptions {
    /// Resolve each referenced cell at most once per evaluation (default: true)
    pub cache_cells: bool,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self { cache_cells: true }
    }
}

/// Context for formula evaluation
///
/// Supplied fresh for each top-level call and only ever read by the engine.
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Cell lookup for references
    pub grid: &'a dyn CellLookup,
    /// Functions callable from formulas
    pub functions: &'a FunctionRegistry,
    pub options: EvaluationOptions,
}

impl<'a> EvaluationContext<'a> {
    /// Create a new evaluation context with default options
    pub fn new(grid: &'a dyn CellLookup, functions: &'a FunctionRegistry) -> Self {
        Self {
            grid,
            functions,
            options: EvaluationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EvaluationOptions) -> Self {
        self.options = options;
        self
    }
}

/// Evaluate a formula expression
pub fn evaluate(expr: &Expr, ctx: &EvaluationContext) -> FormulaResult<Value> {
    Evaluator::new(ctx).evaluate(expr)
}

/// Parse and evaluate formula text (a leading `=` is optional)
///
/// # Example
/// ```rust
/// use gridcalc_core::{Grid, Value};
/// use gridcalc_formula::{evaluate_formula, EvaluationContext, FunctionRegistry};
///
/// let mut grid = Grid::new();
/// grid.set_value("A1", 2.0).unwrap();
/// let functions = FunctionRegistry::standard();
/// let ctx = EvaluationContext::new(&grid, &functions);
///
/// assert_eq!(evaluate_formula("=A1*3+1", &ctx).unwrap(), Value::Number(7.0));
/// ```
pub fn evaluate_formula(source: &str, ctx: &EvaluationContext) -> FormulaResult<Value> {
    let ast = parse_formula(source)?;
    evaluate(&ast, ctx)
}

/// Resolve the cell at a coordinate, evaluating its formula if it has one
///
/// Returns `Ok(None)` for a coordinate with no cell. A formula that fails is reported as a
/// cell with `error` set; only a circular reference or a reference chain nested past
/// [`MAX_EVALUATION_DEPTH`] is returned as `Err`, since those are faults of the dependency
/// graph rather than of one formula.
pub fn evaluate_cell_at(at: Coordinate, ctx: &EvaluationContext) -> FormulaResult<Option<Cell>> {
    Evaluator::new(ctx).resolve_cell(at)
}

/// Stateful evaluator for one evaluation pass
///
/// Tracks the cells currently being resolved (to detect cycles) and, unless disabled,
/// caches resolved cells so a cell referenced from several places is evaluated once.
/// Reusing one `Evaluator` across several calls shares that cache; the grid must not change
/// in between.
pub struct Evaluator<'a> {
    ctx: &'a EvaluationContext<'a>,
    visiting: RefCell<AHashSet<Coordinate>>,
    resolved: RefCell<AHashMap<Coordinate, Option<Cell>>>,
    depth: std::cell::Cell<usize>,
    prefetching: std::cell::Cell<bool>,
}

impl<'a> Evaluator<'a> {
    pub fn new(ctx: &'a EvaluationContext<'a>) -> Self {
        Self {
            ctx,
            visiting: RefCell::new(AHashSet::new()),
            resolved: RefCell::new(AHashMap::new()),
            depth: std::cell::Cell::new(0),
            prefetching: std::cell::Cell::new(false),
        }
    }

    /// Evaluate an expression
    pub fn evaluate(&self, expr: &Expr) -> FormulaResult<Value> {
        let depth = self.depth.get();
        if depth >= MAX_EVALUATION_DEPTH {
            return Err(FormulaError::NestingTooDeep {
                limit: MAX_EVALUATION_DEPTH,
            });
        }
        self.depth.set(depth + 1);
        let result = self.evaluate_node(expr);
        self.depth.set(depth);
        result
    }

    fn evaluate_node(&self, expr: &Expr) -> FormulaResult<Value> {
        match expr {
            // === Literals ===
            Expr::StringLiteral(s) => Ok(Value::Text(s.clone())),
            Expr::NumberLiteral(n) => Ok(Value::Number(*n)),

            // === References ===
            Expr::CellRef(at) => self.reference_value(*at),
            Expr::CellRange { start, end } => self.range_values(*start, *end),

            // === Operators ===
            Expr::Negation(operand) => {
                let value = self.evaluate(operand)?;
                Ok(Value::Number(-require_number("unary -", &value)?))
            }
            Expr::BinaryOp { op, left, right } => self.evaluate_binary_op(*op, left, right),

            // === Functions ===
            Expr::FunctionCall { name, args } => self.evaluate_function(name, args),
        }
    }

    /// Resolve the cell at a coordinate (see [`evaluate_cell_at`])
    pub fn resolve_cell(&self, at: Coordinate) -> FormulaResult<Option<Cell>> {
        if self.ctx.options.cache_cells {
            if let Some(hit) = self.resolved.borrow().get(&at) {
                trace!(cell = %at, "cell cache hit");
                return Ok(hit.clone());
            }
        }

        let resolved = match self.ctx.grid.cell_at(at) {
            None => None,
            Some(cell) => match cell.formula() {
                None => Some(cell.clone()),
                Some(formula) => {
                    if self.ctx.options.cache_cells && !self.prefetching.get() {
                        self.prefetching.set(true);
                        let prefetched = self.resolve_precedents(at, formula);
                        self.prefetching.set(false);
                        prefetched?;
                    }
                    Some(self.resolve_formula(at, cell, formula)?)
                }
            },
        };

        if self.ctx.options.cache_cells {
            self.resolved.borrow_mut().insert(at, resolved.clone());
        }
        Ok(resolved)
    }

    fn resolve_formula(&self, at: Coordinate, cell: &Cell, formula: &str) -> FormulaResult<Cell> {
        if !self.visiting.borrow_mut().insert(at) {
            debug!(cell = %at, "circular reference");
            return Err(FormulaError::CircularReference {
                address: at.to_string(),
            });
        }

        trace!(cell = %at, formula, "resolving formula cell");
        let result = parse_formula(formula).and_then(|ast| self.evaluate(&ast));
        self.visiting.borrow_mut().remove(&at);

        match result {
            Ok(value) => Ok(cell.resolved(Ok(value))),
            Err(e @ FormulaError::CircularReference { .. }) => Err(e),
            Err(e @ FormulaError::NestingTooDeep { .. }) => Err(e),
            Err(e) => {
                debug!(cell = %at, error = %e, "formula cell failed");
                Ok(cell.resolved(Err(CellError::new(e.to_string()))))
            }
        }
    }

    /// Resolve every formula cell that `root` depends on, deepest first
    ///
    /// Walks the reference graph depth-first with an explicit stack and resolves each
    /// precedent once all of its own precedents are cached, so evaluating it never recurses
    /// more than one cell deep. A precedent found on the current path is a cycle.
    fn resolve_precedents(&self, root: Coordinate, formula: &str) -> FormulaResult<()> {
        let mut on_path = AHashSet::new();
        let mut done = AHashSet::new();
        on_path.insert(root);
        let mut stack = vec![(root, self.pending_precedents(formula))];

        while let Some((node, pending)) = stack.last_mut() {
            let node = *node;
            match pending.pop() {
                Some(next) => {
                    if on_path.contains(&next) {
                        debug!(cell = %next, "circular reference");
                        return Err(FormulaError::CircularReference {
                            address: next.to_string(),
                        });
                    }
                    if done.contains(&next) || self.resolved.borrow().contains_key(&next) {
                        continue;
                    }
                    let precedents = match self.ctx.grid.cell_at(next).and_then(Cell::formula) {
                        Some(formula) => self.pending_precedents(formula),
                        None => continue,
                    };
                    on_path.insert(next);
                    stack.push((next, precedents));
                }
                None => {
                    stack.pop();
                    on_path.remove(&node);
                    if node != root {
                        self.resolve_cell(node)?;
                        done.insert(node);
                    }
                }
            }
        }

        Ok(())
    }

    /// Formula cells referenced by `formula` that are not resolved yet, in reverse
    /// reference order so popping yields them first to last
    fn pending_precedents(&self, formula: &str) -> Vec<Coordinate> {
        let ast = match parse_formula(formula) {
            Ok(ast) => ast,
            Err(_) => return Vec::new(),
        };

        let resolved = self.resolved.borrow();
        let mut seen = AHashSet::new();
        let mut pending = Vec::new();
        ast.for_each_reference(&mut |at| {
            let is_formula = self
                .ctx
                .grid
                .cell_at(at)
                .map_or(false, |cell| cell.formula().is_some());
            if is_formula && !resolved.contains_key(&at) && seen.insert(at) {
                pending.push(at);
            }
        });
        pending.reverse();
        pending
    }

    fn reference_value(&self, at: Coordinate) -> FormulaResult<Value> {
        match self.resolve_cell(at)? {
            None => Ok(Value::Empty),
            Some(cell) => {
                if let Some(error) = cell.error() {
                    return Err(dependent_error(at, error));
                }
                Ok(cell.value().cloned().unwrap_or_default())
            }
        }
    }

    fn range_values(&self, start: Coordinate, end: Coordinate) -> FormulaResult<Value> {
        let mut values = Vec::new();

        for at in CellRange::new(start, end).cells() {
            let cell = match self.resolve_cell(at)? {
                Some(cell) => cell,
                None => continue,
            };
            if let Some(error) = cell.error() {
                return Err(dependent_error(at, error));
            }
            match cell.value() {
                Some(value) if !value.is_empty() => values.push(value.clone()),
                _ => {}
            }
        }

        Ok(Value::Sequence(values))
    }

    fn evaluate_binary_op(
        &self,
        op: BinaryOperator,
        left: &Expr,
        right: &Expr,
    ) -> FormulaResult<Value> {
        let l = require_number(op.symbol(), &self.evaluate(left)?)?;
        let r = require_number(op.symbol(), &self.evaluate(right)?)?;

        let result = match op {
            BinaryOperator::Add => l + r,
            BinaryOperator::Subtract => l - r,
            BinaryOperator::Multiply => l * r,
            BinaryOperator::Divide => {
                if r == 0.0 {
                    return Err(FormulaError::DivisionByZero);
                }
                l / r
            }
        };

        Ok(Value::Number(result))
    }

    fn evaluate_function(&self, name: &str, args: &[Expr]) -> FormulaResult<Value> {
        let func = self
            .ctx
            .functions
            .get(name)
            .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;

        // Evaluate arguments
        let mut evaluated_args = Vec::with_capacity(args.len());
        for arg in args {
            evaluated_args.push(self.evaluate(arg)?);
        }

        func.call(&evaluated_args)
    }
}

fn dependent_error(at: Coordinate, error: &CellError) -> FormulaError {
    FormulaError::DependentCell {
        address: at.to_string(),
        cause: error.to_string(),
    }
}

fn require_number(operator: &str, value: &Value) -> FormulaResult<f64> {
    value.as_number().ok_or_else(|| FormulaError::NonNumericOperand {
        operator: operator.to_string(),
        value: describe(value),
    })
}

fn describe(value: &Value) -> String {
    match value {
        Value::Empty => "an empty value".to_string(),
        Value::Text(s) => format!("\"{}\"", s),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcalc_core::Grid;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn eval_in(grid: &Grid, formula: &str) -> FormulaResult<Value> {
        let functions = FunctionRegistry::standard();
        let ctx = EvaluationContext::new(grid, &functions);
        evaluate_formula(formula, &ctx)
    }

    fn eval(formula: &str) -> FormulaResult<Value> {
        eval_in(&Grid::new(), formula)
    }

    #[test]
    fn test_evaluate_literals() {
        assert_eq!(eval("42").unwrap(), Value::Number(42.0));
        assert_eq!(eval("\"Hello\"").unwrap(), Value::text("Hello"));
        assert_eq!(eval("\"\"").unwrap(), Value::text(""));
    }

    #[test]
    fn test_evaluate_arithmetic() {
        assert_eq!(eval("8-3-1").unwrap(), Value::Number(4.0));
        assert_eq!(eval("2+3*4").unwrap(), Value::Number(14.0));
        assert_eq!(eval("(2+3)*4").unwrap(), Value::Number(20.0));
        assert_eq!(eval("16/4/2").unwrap(), Value::Number(2.0));
        assert_eq!(eval("7.5-0.5").unwrap(), Value::Number(7.0));
    }

    #[test]
    fn test_evaluate_negation() {
        assert_eq!(eval("-5").unwrap(), Value::Number(-5.0));
        assert_eq!(eval("-2+3").unwrap(), Value::Number(-5.0));
        assert_eq!(eval("--5").unwrap(), Value::Number(5.0));
        assert_eq!(eval("1+-2").unwrap(), Value::Number(-1.0));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval("5/0"), Err(FormulaError::DivisionByZero));
        assert_eq!(eval("5/(2-2)"), Err(FormulaError::DivisionByZero));
        assert_eq!(eval("0/5").unwrap(), Value::Number(0.0));
    }

    #[test]
    fn test_non_numeric_operand() {
        assert_eq!(
            eval("1+\"a\""),
            Err(FormulaError::NonNumericOperand {
                operator: "+".into(),
                value: "\"a\"".into(),
            })
        );
        assert!(matches!(
            eval("-\"a\""),
            Err(FormulaError::NonNumericOperand { ref operator, .. }) if operator == "unary -"
        ));
        // Empty cells are not numbers
        assert!(matches!(
            eval("A1*2"),
            Err(FormulaError::NonNumericOperand { ref value, .. }) if value == "an empty value"
        ));
    }

    #[test]
    fn test_left_operand_checked_before_right_is_evaluated() {
        // The right side would fail with DivisionByZero if it were reached.
        assert!(matches!(
            eval("\"a\"+(1/0)"),
            Err(FormulaError::NonNumericOperand { .. })
        ));
    }

    #[test]
    fn test_cell_references() {
        let mut grid = Grid::new();
        grid.set_value("A1", 10.0).unwrap();
        grid.set_value("B1", "text").unwrap();
        grid.set_formula("C1", "=A1*2").unwrap();

        assert_eq!(eval_in(&grid, "A1").unwrap(), Value::Number(10.0));
        assert_eq!(eval_in(&grid, "b1").unwrap(), Value::text("text"));
        assert_eq!(eval_in(&grid, "C1+1").unwrap(), Value::Number(21.0));
        assert_eq!(eval_in(&grid, "Z99").unwrap(), Value::Empty);
    }

    #[test]
    fn test_dependent_error() {
        let mut grid = Grid::new();
        grid.set_formula("A1", "=5/0").unwrap();

        assert_eq!(
            eval_in(&grid, "=A1+1"),
            Err(FormulaError::DependentCell {
                address: "A1".into(),
                cause: "Division by zero".into(),
            })
        );
    }

    #[test]
    fn test_dependent_error_chains_through_cells() {
        let mut grid = Grid::new();
        grid.set_formula("A1", "=FOO()").unwrap();
        grid.set_formula("A2", "=A1").unwrap();

        match eval_in(&grid, "A2") {
            Err(FormulaError::DependentCell { address, cause }) => {
                assert_eq!(address, "A2");
                assert!(cause.contains("A1"), "cause: {}", cause);
            }
            other => panic!("Expected DependentCell, got {:?}", other),
        }
    }

    #[test]
    fn test_stored_error_is_dependent() {
        let mut grid = Grid::new();
        grid.set_error_at(Coordinate::new(0, 1), CellError::new("bad input"));

        assert_eq!(
            eval_in(&grid, "SUM(A1:C1)"),
            Err(FormulaError::DependentCell {
                address: "B1".into(),
                cause: "bad input".into(),
            })
        );
    }

    #[test]
    fn test_range_collects_row_major_and_skips_empty() {
        let mut grid = Grid::new();
        grid.set_value("A1", 1).unwrap();
        grid.set_value("B1", 2).unwrap();
        grid.set_value("B2", 4).unwrap();
        grid.set_value("A2", Value::Empty).unwrap();

        assert_eq!(
            eval_in(&grid, "B2:A1").unwrap(),
            Value::Sequence(vec![1.into(), 2.into(), 4.into()])
        );
        assert_eq!(eval_in(&grid, "C5:D9").unwrap(), Value::Sequence(vec![]));
    }

    #[test]
    fn test_sum_over_range_receives_sequence() {
        let mut grid = Grid::new();
        grid.set_value("A1", 1).unwrap();
        grid.set_value("A2", 2).unwrap();
        grid.set_value("A3", 3).unwrap();

        let seen: Arc<Mutex<Vec<Value>>> = Arc::default();
        let mut functions = FunctionRegistry::new();
        let recorder = Arc::clone(&seen);
        functions.register_fn("sum", move |args| {
            recorder.lock().unwrap().extend(args.iter().cloned());
            crate::functions::math::fn_sum(args)
        });

        let ctx = EvaluationContext::new(&grid, &functions);
        assert_eq!(
            evaluate_formula("SUM(A1:A3)", &ctx).unwrap(),
            Value::Number(6.0)
        );
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Value::Sequence(vec![1.into(), 2.into(), 3.into()])]
        );
    }

    #[test]
    fn test_unknown_function() {
        let grid = Grid::new();
        let functions = FunctionRegistry::new();
        let ctx = EvaluationContext::new(&grid, &functions);
        assert_eq!(
            evaluate_formula("FOO(1)", &ctx),
            Err(FormulaError::UnknownFunction("FOO".into()))
        );
    }

    #[test]
    fn test_arguments_evaluated_left_to_right() {
        let grid = Grid::new();
        let order: Arc<Mutex<Vec<String>>> = Arc::default();
        let mut functions = FunctionRegistry::new();
        for name in ["first", "second"] {
            let order = Arc::clone(&order);
            functions.register_fn(name, move |_| {
                order.lock().unwrap().push(name.to_string());
                Ok(Value::Number(0.0))
            });
        }
        functions.register_fn("pair", |args| Ok(Value::Sequence(args.to_vec())));

        let ctx = EvaluationContext::new(&grid, &functions);
        evaluate_formula("PAIR(FIRST(), SECOND())", &ctx).unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_circular_reference() {
        let mut grid = Grid::new();
        grid.set_formula("A1", "=B1").unwrap();
        grid.set_formula("B1", "=A1+1").unwrap();
        grid.set_formula("C1", "=C1").unwrap();

        let functions = FunctionRegistry::new();
        let ctx = EvaluationContext::new(&grid, &functions);

        assert_eq!(
            evaluate_cell_at(Coordinate::new(0, 0), &ctx),
            Err(FormulaError::CircularReference {
                address: "A1".into()
            })
        );
        assert!(matches!(
            evaluate_cell_at(Coordinate::new(0, 2), &ctx),
            Err(FormulaError::CircularReference { .. })
        ));
        assert!(matches!(
            evaluate_formula("B1:A1", &ctx),
            Err(FormulaError::CircularReference { .. })
        ));
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let mut grid = Grid::new();
        grid.set_value("A1", 1).unwrap();
        grid.set_formula("B1", "=A1+1").unwrap();
        grid.set_formula("B2", "=A1+2").unwrap();
        grid.set_formula("C1", "=B1+B2+B1").unwrap();

        for cache_cells in [true, false] {
            let functions = FunctionRegistry::new();
            let ctx = EvaluationContext::new(&grid, &functions)
                .with_options(EvaluationOptions { cache_cells });
            assert_eq!(evaluate_formula("C1", &ctx).unwrap(), Value::Number(7.0));
        }
    }

    /// Column A holding `1` at `seed_row` and `=A{next}+1` in every other row up to `rows`
    fn chain(rows: u32, seed_row: u32, next: impl Fn(u32) -> u32) -> Grid {
        let mut grid = Grid::new();
        for row in 1..=rows {
            let address = format!("A{}", row);
            if row == seed_row {
                grid.set_value(&address, 1).unwrap();
            } else {
                grid.set_formula(&address, &format!("=A{}+1", next(row))).unwrap();
            }
        }
        grid
    }

    #[test]
    fn test_long_chains_resolve_without_deep_recursion() {
        let down = chain(10_000, 1, |row| row - 1);
        assert_eq!(eval_in(&down, "A10000").unwrap(), Value::Number(10_000.0));

        let up = chain(10_000, 10_000, |row| row + 1);
        assert_eq!(eval_in(&up, "A1").unwrap(), Value::Number(10_000.0));
        assert_eq!(eval_in(&up, "A1-A2").unwrap(), Value::Number(1.0));

        let functions = FunctionRegistry::new();
        let ctx = EvaluationContext::new(&up, &functions);
        let a1 = evaluate_cell_at(Coordinate::new(0, 0), &ctx).unwrap().unwrap();
        assert_eq!(a1.value(), Some(&Value::Number(10_000.0)));
    }

    #[test]
    fn test_uncached_long_chain_hits_depth_limit() {
        let grid = chain(10_000, 1, |row| row - 1);
        let functions = FunctionRegistry::new();
        let ctx = EvaluationContext::new(&grid, &functions)
            .with_options(EvaluationOptions { cache_cells: false });

        assert_eq!(
            evaluate_formula("A10000", &ctx),
            Err(FormulaError::NestingTooDeep {
                limit: MAX_EVALUATION_DEPTH
            })
        );
        assert_eq!(evaluate_formula("A100", &ctx).unwrap(), Value::Number(100.0));
    }

    #[test]
    fn test_long_ring_is_circular() {
        let mut grid = Grid::new();
        for row in 1..=10_000u32 {
            let next = if row == 10_000 { 1 } else { row + 1 };
            grid.set_formula(&format!("A{}", row), &format!("=A{}", next))
                .unwrap();
        }

        let functions = FunctionRegistry::new();
        let ctx = EvaluationContext::new(&grid, &functions);
        assert_eq!(
            evaluate_cell_at(Coordinate::new(0, 0), &ctx),
            Err(FormulaError::CircularReference {
                address: "A1".into()
            })
        );
        assert!(matches!(
            evaluate_formula("A5000*2", &ctx),
            Err(FormulaError::CircularReference { .. })
        ));
    }

    #[test]
    fn test_cache_resolves_shared_cell_once() {
        let mut grid = Grid::new();
        grid.set_formula("A1", "=TICK()").unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let mut functions = FunctionRegistry::new();
        let counter = Arc::clone(&calls);
        functions.register_fn("tick", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Number(1.0))
        });

        let ctx = EvaluationContext::new(&grid, &functions);
        assert_eq!(evaluate_formula("A1+A1+A1", &ctx).unwrap(), Value::Number(3.0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let uncached = ctx.with_options(EvaluationOptions { cache_cells: false });
        evaluate_formula("A1+A1+A1", &uncached).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_evaluate_cell_at() {
        let mut grid = Grid::new();
        grid.set_value("A1", 2).unwrap();
        grid.set_formula("A2", "=A1*A1").unwrap();
        grid.set_formula("A3", "=1+").unwrap();

        let functions = FunctionRegistry::new();
        let ctx = EvaluationContext::new(&grid, &functions);

        let a2 = evaluate_cell_at(Coordinate::new(1, 0), &ctx).unwrap().unwrap();
        assert_eq!(a2.value(), Some(&Value::Number(4.0)));
        assert_eq!(a2.formula(), Some("=A1*A1"));

        let a3 = evaluate_cell_at(Coordinate::new(2, 0), &ctx).unwrap().unwrap();
        assert!(a3.value().is_none());
        assert_eq!(
            a3.error().map(CellError::message),
            Some("Unexpected end of input")
        );

        assert_eq!(evaluate_cell_at(Coordinate::new(9, 9), &ctx).unwrap(), None);
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let mut grid = Grid::new();
        grid.set_value("A1", 3).unwrap();
        grid.set_formula("A2", "=A1*2").unwrap();
        let functions = FunctionRegistry::standard();
        let ctx = EvaluationContext::new(&grid, &functions);

        let first = evaluate_formula("SUM(A1:A2)/A1", &ctx);
        let second = evaluate_formula("SUM(A1:A2)/A1", &ctx);
        assert_eq!(first, second);
        assert_eq!(first.unwrap(), Value::Number(3.0));
    }

    #[test]
    fn test_ast_evaluates_itself() {
        let grid = Grid::new();
        let functions = FunctionRegistry::standard();
        let ctx = EvaluationContext::new(&grid, &functions);
        let ast = parse_formula("max(1, 5, 3) * 2").unwrap();
        assert_eq!(ast.evaluate(&ctx).unwrap(), Value::Number(10.0));
    }
}
