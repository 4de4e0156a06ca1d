//! Function registry and the standard function library
//!
//! The engine owns no functions of its own: every call is looked up by name in the
//! [`FunctionRegistry`] supplied with the evaluation context. [`FunctionRegistry::standard`]
//! returns a registry preloaded with the functions in [`math`] and [`text`].

pub mod math;
pub mod text;

use crate::error::{FormulaError, FormulaResult};
use ahash::AHashMap;
use gridcalc_core::Value;
use std::fmt;

/// Function implementation signature
///
/// Arguments arrive already evaluated, left to right. A range argument arrives as a single
/// [`Value::Sequence`].
pub type FunctionImpl = Box<dyn Fn(&[Value]) -> FormulaResult<Value> + Send + Sync>;

/// Function definition
pub struct FunctionDef {
    /// Function name as registered
    pub name: String,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: FunctionImpl,
}

impl FunctionDef {
    pub fn new<F>(name: &str, min_args: usize, max_args: Option<usize>, implementation: F) -> Self
    where
        F: Fn(&[Value]) -> FormulaResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            min_args,
            max_args,
            implementation: Box::new(implementation),
        }
    }

    /// A function accepting any number of arguments
    pub fn variadic<F>(name: &str, implementation: F) -> Self
    where
        F: Fn(&[Value]) -> FormulaResult<Value> + Send + Sync + 'static,
    {
        Self::new(name, 0, None, implementation)
    }

    /// Check the argument count, then run the implementation
    pub fn call(&self, args: &[Value]) -> FormulaResult<Value> {
        if args.len() < self.min_args {
            return Err(FormulaError::ArgumentCount {
                function: self.name.to_uppercase(),
                expected: format!("at least {}", self.min_args),
                actual: args.len(),
            });
        }

        if let Some(max) = self.max_args {
            if args.len() > max {
                return Err(FormulaError::ArgumentCount {
                    function: self.name.to_uppercase(),
                    expected: format!("at most {}", max),
                    actual: args.len(),
                });
            }
        }

        (self.implementation)(args)
    }
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("name", &self.name)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .finish_non_exhaustive()
    }
}

/// Function registry keyed by lower-cased name
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: AHashMap<String, FunctionDef>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the standard library registered
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register_math_functions();
        registry.register_text_functions();
        registry
    }

    /// Look up a function by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Register a function, replacing any previous one with the same name
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.to_lowercase(), def);
    }

    /// Register a variadic closure
    pub fn register_fn<F>(&mut self, name: &str, implementation: F)
    where
        F: Fn(&[Value]) -> FormulaResult<Value> + Send + Sync + 'static,
    {
        self.register(FunctionDef::variadic(name, implementation));
    }

    /// Registered names (lower-cased), sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn register_math_functions(&mut self) {
        self.register(FunctionDef::new("SUM", 0, None, math::fn_sum));
        self.register(FunctionDef::new("AVERAGE", 1, None, math::fn_average));
        self.register(FunctionDef::new("MIN", 0, None, math::fn_min));
        self.register(FunctionDef::new("MAX", 0, None, math::fn_max));
        self.register(FunctionDef::new("COUNT", 0, None, math::fn_count));
        self.register(FunctionDef::new("PRODUCT", 0, None, math::fn_product));
        self.register(FunctionDef::new("ABS", 1, Some(1), math::fn_abs));
        self.register(FunctionDef::new("ROUND", 1, Some(2), math::fn_round));
    }

    fn register_text_functions(&mut self) {
        self.register(FunctionDef::new("CONCAT", 0, None, text::fn_concat));
        self.register(FunctionDef::new("LEN", 1, Some(1), text::fn_len));
        self.register(FunctionDef::new("UPPER", 1, Some(1), text::fn_upper));
        self.register(FunctionDef::new("LOWER", 1, Some(1), text::fn_lower));
    }
}

/// Positional argument, or a function error naming the missing position
pub(crate) fn arg<'a>(function: &str, args: &'a [Value], index: usize) -> FormulaResult<&'a Value> {
    args.get(index).ok_or_else(|| {
        FormulaError::function(function, format!("missing argument {}", index + 1))
    })
}

/// Require a scalar number argument
pub(crate) fn number_arg(function: &str, value: &Value) -> FormulaResult<f64> {
    value.as_number().ok_or_else(|| {
        FormulaError::function(
            function,
            format!("expected a number, got {}", value.type_name()),
        )
    })
}

/// Every number in the arguments, sequences flattened; other values are skipped
pub(crate) fn numbers(args: &[Value]) -> Vec<f64> {
    args.iter()
        .flat_map(Value::scalars)
        .filter_map(Value::as_number)
        .collect()
}
