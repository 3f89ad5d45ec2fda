//! Built-in FEEL functions
//!
//! A `Missing` argument makes the whole call `Missing`.

use crate::error::{Result, RuntimeError};
use std::cmp::Ordering;
use verdict_core::ast::{BuiltinFunction, Operator};
use verdict_core::Value;

/// Call a built-in with evaluated arguments; arity is checked at parse time
pub(crate) fn call(function: BuiltinFunction, args: &[Value]) -> Result<Value> {
    if args.iter().any(Value::is_missing) {
        return Ok(Value::Missing);
    }

    match function {
        BuiltinFunction::StringLength => {
            Ok(Value::Number(text(function, args, 0)?.chars().count() as f64))
        }
        BuiltinFunction::UpperCase => Ok(Value::Text(text(function, args, 0)?.to_uppercase())),
        BuiltinFunction::LowerCase => Ok(Value::Text(text(function, args, 0)?.to_lowercase())),
        BuiltinFunction::Substring => substring(function, args),
        BuiltinFunction::Contains => {
            let haystack = text(function, args, 0)?;
            Ok(Value::Bool(haystack.contains(text(function, args, 1)?)))
        }
        BuiltinFunction::StartsWith => {
            let s = text(function, args, 0)?;
            Ok(Value::Bool(s.starts_with(text(function, args, 1)?)))
        }
        BuiltinFunction::EndsWith => {
            let s = text(function, args, 0)?;
            Ok(Value::Bool(s.ends_with(text(function, args, 1)?)))
        }
        BuiltinFunction::ListContains => {
            let items = list(function, args, 0)?;
            let needle = arg(function, args, 1)?;
            Ok(Value::Bool(items.iter().any(|item| item.equals(needle))))
        }
        BuiltinFunction::Count => Ok(Value::Number(list(function, args, 0)?.len() as f64)),
        BuiltinFunction::Sum => {
            let mut total = 0.0;
            for item in list(function, args, 0)? {
                total += item.as_number().ok_or_else(|| {
                    invalid(function, format!("expected numbers, found {}", item.kind_name()))
                })?;
            }
            Ok(Value::Number(total))
        }
        BuiltinFunction::Min => extreme(function, args, Ordering::Less),
        BuiltinFunction::Max => extreme(function, args, Ordering::Greater),
        BuiltinFunction::Abs => Ok(Value::Number(number(function, args, 0)?.abs())),
        BuiltinFunction::Floor => Ok(Value::Number(number(function, args, 0)?.floor())),
        BuiltinFunction::Ceiling => Ok(Value::Number(number(function, args, 0)?.ceil())),
    }
}

fn invalid(function: BuiltinFunction, message: impl Into<String>) -> RuntimeError {
    RuntimeError::InvalidArgument {
        function: function.name().to_string(),
        message: message.into(),
    }
}

fn arg(function: BuiltinFunction, args: &[Value], index: usize) -> Result<&Value> {
    args.get(index)
        .ok_or_else(|| invalid(function, format!("missing argument {}", index + 1)))
}

fn text(function: BuiltinFunction, args: &[Value], index: usize) -> Result<&str> {
    let value = arg(function, args, index)?;
    value.as_text().ok_or_else(|| {
        invalid(
            function,
            format!("argument {} must be text, got {}", index + 1, value.kind_name()),
        )
    })
}

fn number(function: BuiltinFunction, args: &[Value], index: usize) -> Result<f64> {
    let value = arg(function, args, index)?;
    value.as_number().ok_or_else(|| {
        invalid(
            function,
            format!("argument {} must be a number, got {}", index + 1, value.kind_name()),
        )
    })
}

fn list(function: BuiltinFunction, args: &[Value], index: usize) -> Result<&[Value]> {
    let value = arg(function, args, index)?;
    value.as_list().ok_or_else(|| {
        invalid(
            function,
            format!("argument {} must be a list, got {}", index + 1, value.kind_name()),
        )
    })
}

/// 1-based start; negative starts count from the end
fn substring(function: BuiltinFunction, args: &[Value]) -> Result<Value> {
    let chars: Vec<char> = text(function, args, 0)?.chars().collect();
    let start = number(function, args, 1)?;
    if start.fract() != 0.0 || start == 0.0 {
        return Err(invalid(function, "start position must be a non-zero integer"));
    }

    let len = chars.len() as i64;
    let offset = if start > 0.0 {
        start as i64 - 1
    } else {
        len + start as i64
    };
    let begin = offset.clamp(0, len) as usize;

    let end = match args.get(2) {
        Some(_) => {
            let length = number(function, args, 2)?;
            if length < 0.0 || length.fract() != 0.0 {
                return Err(invalid(function, "length must be a non-negative integer"));
            }
            let available = chars.len() - begin;
            begin + (length.min(available as f64) as usize)
        }
        None => chars.len(),
    };

    Ok(Value::Text(chars[begin..end].iter().collect()))
}

/// `min`/`max` over the arguments, or over a single list argument
fn extreme(function: BuiltinFunction, args: &[Value], wanted: Ordering) -> Result<Value> {
    let items = match args {
        [Value::List(items)] => items.as_slice(),
        _ => args,
    };

    let mut best: Option<&Value> = None;
    for item in items {
        best = match best {
            None => Some(item),
            Some(current) => {
                let ordering = item
                    .ordering(current, Operator::Lt)?
                    .ok_or_else(|| invalid(function, "values cannot be ordered"))?;
                Some(if ordering == wanted { item } else { current })
            }
        };
    }
    Ok(best.cloned().unwrap_or(Value::Missing))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call_ok(function: BuiltinFunction, args: Vec<Value>) -> Value {
        call(function, &args).unwrap()
    }

    #[test]
    fn test_string_functions() {
        assert_eq!(
            call_ok(BuiltinFunction::StringLength, vec![Value::from("héllo")]),
            Value::from(5)
        );
        assert_eq!(
            call_ok(BuiltinFunction::UpperCase, vec![Value::from("gold")]),
            Value::from("GOLD")
        );
        assert_eq!(
            call_ok(BuiltinFunction::StartsWith, vec![Value::from("ACME-1"), Value::from("ACME")]),
            Value::Bool(true)
        );
        assert_eq!(
            call_ok(BuiltinFunction::Contains, vec![Value::from("premium plan"), Value::from("plan")]),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_substring() {
        let s = || Value::from("foobar");
        assert_eq!(
            call_ok(BuiltinFunction::Substring, vec![s(), Value::from(3)]),
            Value::from("obar")
        );
        assert_eq!(
            call_ok(BuiltinFunction::Substring, vec![s(), Value::from(2), Value::from(3)]),
            Value::from("oob")
        );
        assert_eq!(
            call_ok(BuiltinFunction::Substring, vec![s(), Value::from(-2)]),
            Value::from("ar")
        );
        assert!(call(BuiltinFunction::Substring, &[s(), Value::from(0)]).is_err());
    }

    #[test]
    fn test_substring_length_past_the_end() {
        assert_eq!(
            call_ok(
                BuiltinFunction::Substring,
                vec![Value::from("abc"), Value::Number(2.0), Value::Number(1e20)]
            ),
            Value::from("bc")
        );
        assert_eq!(
            call_ok(
                BuiltinFunction::Substring,
                vec![Value::from("abc"), Value::Number(9.0), Value::Number(1e20)]
            ),
            Value::from("")
        );
        assert!(call(
            BuiltinFunction::Substring,
            &[Value::from("abc"), Value::Number(1.0), Value::Number(f64::INFINITY)]
        )
        .is_err());
    }

    #[test]
    fn test_list_functions() {
        let amounts = Value::from(vec![10, 25, 5]);
        assert_eq!(call_ok(BuiltinFunction::Count, vec![amounts.clone()]), Value::from(3));
        assert_eq!(call_ok(BuiltinFunction::Sum, vec![amounts.clone()]), Value::from(40));
        assert_eq!(call_ok(BuiltinFunction::Max, vec![amounts.clone()]), Value::from(25));
        assert_eq!(
            call_ok(BuiltinFunction::Min, vec![Value::from(4), Value::from(2), Value::from(9)]),
            Value::from(2)
        );
        assert_eq!(
            call_ok(BuiltinFunction::ListContains, vec![amounts, Value::from(5)]),
            Value::Bool(true)
        );
        assert_eq!(call_ok(BuiltinFunction::Min, vec![Value::List(vec![])]), Value::Missing);
    }

    #[test]
    fn test_numeric_functions() {
        assert_eq!(call_ok(BuiltinFunction::Abs, vec![Value::from(-3)]), Value::from(3));
        assert_eq!(call_ok(BuiltinFunction::Floor, vec![Value::from(2.7)]), Value::from(2));
        assert_eq!(call_ok(BuiltinFunction::Ceiling, vec![Value::from(2.1)]), Value::from(3));
    }

    #[test]
    fn test_missing_and_invalid_arguments() {
        assert_eq!(
            call_ok(BuiltinFunction::StringLength, vec![Value::Missing]),
            Value::Missing
        );
        assert!(matches!(
            call(BuiltinFunction::StringLength, &[Value::from(3)]),
            Err(RuntimeError::InvalidArgument { .. })
        ));
        assert!(call(BuiltinFunction::Sum, &[Value::from(vec!["a"])]).is_err());
        assert!(call(BuiltinFunction::Max, &[Value::from(1), Value::from("a")]).is_err());
    }
}
