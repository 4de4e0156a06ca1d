//! Text functions

use super::arg;
use crate::error::{FormulaError, FormulaResult};
use gridcalc_core::Value;

fn scalar_text(function: &str, value: &Value) -> FormulaResult<String> {
    match value {
        Value::Sequence(_) => Err(FormulaError::function(
            function,
            "expected a single value, got a sequence",
        )),
        other => Ok(other.to_string()),
    }
}

/// CONCAT function: joins every argument, sequences flattened
pub fn fn_concat(args: &[Value]) -> FormulaResult<Value> {
    let joined: String = args
        .iter()
        .flat_map(Value::scalars)
        .map(|v| v.to_string())
        .collect();
    Ok(Value::Text(joined))
}

/// LEN function: character count of the displayed value
pub fn fn_len(args: &[Value]) -> FormulaResult<Value> {
    let text = scalar_text("LEN", arg("LEN", args, 0)?)?;
    Ok(Value::Number(text.chars().count() as f64))
}

/// UPPER function
pub fn fn_upper(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Text(scalar_text("UPPER", arg("UPPER", args, 0)?)?.to_uppercase()))
}

/// LOWER function
pub fn fn_lower(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Text(scalar_text("LOWER", arg("LOWER", args, 0)?)?.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat() {
        let args = [
            Value::text("a"),
            Value::Sequence(vec![Value::Number(1.0), Value::text("b")]),
            Value::Number(2.5),
        ];
        assert_eq!(fn_concat(&args).unwrap(), Value::text("a1b2.5"));
    }

    #[test]
    fn test_len_upper_lower() {
        assert_eq!(fn_len(&[Value::text("héllo")]).unwrap(), Value::Number(5.0));
        assert_eq!(fn_len(&[Value::Number(12.0)]).unwrap(), Value::Number(2.0));
        assert_eq!(fn_upper(&[Value::text("abc")]).unwrap(), Value::text("ABC"));
        assert_eq!(fn_lower(&[Value::text("AbC")]).unwrap(), Value::text("abc"));
        assert!(fn_upper(&[Value::Sequence(vec![])]).is_err());
    }

    #[test]
    fn test_missing_argument_is_an_error() {
        for f in [fn_len, fn_upper, fn_lower] {
            assert!(matches!(f(&[]), Err(FormulaError::Function { .. })));
        }
    }
}
