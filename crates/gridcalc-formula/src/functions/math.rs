//! Math and aggregate functions
//!
//! Aggregates flatten sequence arguments and skip anything that is not a number.

use super::{arg, number_arg, numbers};
use crate::error::{FormulaError, FormulaResult};
use gridcalc_core::Value;

/// SUM function
pub fn fn_sum(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(numbers(args).iter().sum()))
}

/// AVERAGE function
pub fn fn_average(args: &[Value]) -> FormulaResult<Value> {
    let values = numbers(args);
    if values.is_empty() {
        return Err(FormulaError::function("AVERAGE", "division by zero"));
    }
    Ok(Value::Number(values.iter().sum::<f64>() / values.len() as f64))
}

/// MIN function (0 when there are no numbers)
pub fn fn_min(args: &[Value]) -> FormulaResult<Value> {
    let min = numbers(args).into_iter().reduce(f64::min).unwrap_or(0.0);
    Ok(Value::Number(min))
}

/// MAX function (0 when there are no numbers)
pub fn fn_max(args: &[Value]) -> FormulaResult<Value> {
    let max = numbers(args).into_iter().reduce(f64::max).unwrap_or(0.0);
    Ok(Value::Number(max))
}

/// COUNT function
pub fn fn_count(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(numbers(args).len() as f64))
}

/// PRODUCT function (0 when there are no numbers)
pub fn fn_product(args: &[Value]) -> FormulaResult<Value> {
    let values = numbers(args);
    if values.is_empty() {
        return Ok(Value::Number(0.0));
    }
    Ok(Value::Number(values.iter().product()))
}

/// ABS function
pub fn fn_abs(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(number_arg("ABS", arg("ABS", args, 0)?)?.abs()))
}

/// ROUND function: half away from zero, optional digit count (negative rounds left of
/// the decimal point)
///
/// Digit counts past the range of `f64` leave the number as is, or round it to 0 when
/// negative.
pub fn fn_round(args: &[Value]) -> FormulaResult<Value> {
    let n = number_arg("ROUND", arg("ROUND", args, 0)?)?;
    let digits = match args.get(1) {
        Some(v) => (number_arg("ROUND", v)?.trunc() as i32).clamp(-400, 400),
        None => 0,
    };

    let rounded = if digits >= 0 {
        let factor = 10f64.powi(digits);
        let scaled = n * factor;
        if scaled.is_finite() {
            scaled.round() / factor
        } else {
            n
        }
    } else {
        let factor = 10f64.powi(-digits);
        if factor.is_finite() {
            (n / factor).round() * factor
        } else {
            0.0
        }
    };
    Ok(Value::Number(rounded))
}
