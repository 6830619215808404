use std::cmp::Ordering;

use crate::value::{self, Value};

/*
Arity checking is done in `call` prior to invoking the builtin, so every
function below may index into `args` up to its declared minimum.
*/

#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub name: &'static str,
    pub min_arity: usize,
    pub max_arity: usize,
    pub func: fn(&[Value]) -> Result<Value, String>,
}

const VARIADIC: usize = usize::MAX;

const BUILTINS: &[NativeFunction] = &[
    NativeFunction { name: "len", min_arity: 1, max_arity: 1, func: len },
    NativeFunction { name: "str", min_arity: 0, max_arity: 1, func: str },
    NativeFunction { name: "int", min_arity: 0, max_arity: 1, func: int },
    NativeFunction { name: "float", min_arity: 0, max_arity: 1, func: float },
    NativeFunction { name: "bool", min_arity: 0, max_arity: 1, func: bool },
    NativeFunction { name: "abs", min_arity: 1, max_arity: 1, func: abs },
    NativeFunction { name: "min", min_arity: 1, max_arity: VARIADIC, func: min },
    NativeFunction { name: "max", min_arity: 1, max_arity: VARIADIC, func: max },
    NativeFunction { name: "sum", min_arity: 1, max_arity: 1, func: sum },
    NativeFunction { name: "round", min_arity: 1, max_arity: 2, func: round },
    NativeFunction { name: "range", min_arity: 1, max_arity: 3, func: range },
];

pub fn lookup(name: &str) -> Option<&'static NativeFunction> {
    BUILTINS.iter().find(|builtin| builtin.name == name)
}

pub fn call(builtin: &NativeFunction, args: &[Value]) -> Result<Value, String> {
    if args.len() < builtin.min_arity || args.len() > builtin.max_arity {
        let expected = if builtin.max_arity == VARIADIC {
            format!("at least {}", builtin.min_arity)
        } else if builtin.min_arity == builtin.max_arity {
            builtin.min_arity.to_string()
        } else {
            format!("{} to {}", builtin.min_arity, builtin.max_arity)
        };
        return Err(format!(
            "{}() takes {} argument(s) ({} given)",
            builtin.name,
            expected,
            args.len()
        ));
    }
    (builtin.func)(args)
}

fn expect_number(name: &str, val: &Value) -> Result<f64, String> {
    val.as_number().ok_or_else(|| {
        format!(
            "{}() expected a number, got '{}'",
            name,
            value::type_of(val)
        )
    })
}

fn expect_integer(name: &str, val: &Value) -> Result<i64, String> {
    let num = expect_number(name, val)?;
    if num.fract() != 0.0 {
        return Err(format!("'float' object cannot be interpreted as an integer in {}()", name));
    }
    Ok(num as i64)
}

pub fn len(args: &[Value]) -> Result<Value, String> {
    match &args[0] {
        Value::Str(s) => Ok(Value::Number(s.chars().count() as f64)),
        Value::List(elements) => Ok(Value::Number(elements.len() as f64)),
        val => Err(format!(
            "object of type '{}' has no len()",
            value::type_of(val)
        )),
    }
}

pub fn str(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Str(
        args.first().map(|val| val.to_string()).unwrap_or_default(),
    ))
}

pub fn int(args: &[Value]) -> Result<Value, String> {
    match args.first() {
        None => Ok(Value::Number(0.0)),
        Some(Value::Str(s)) => s
            .trim()
            .parse::<i64>()
            .map(|num| Value::Number(num as f64))
            .map_err(|_| format!("invalid literal for int() with base 10: '{}'", s)),
        Some(val) => Ok(Value::Number(expect_number("int", val)?.trunc())),
    }
}

pub fn float(args: &[Value]) -> Result<Value, String> {
    match args.first() {
        None => Ok(Value::Number(0.0)),
        Some(Value::Str(s)) => s
            .trim()
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| format!("could not convert string to float: '{}'", s)),
        Some(val) => Ok(Value::Number(expect_number("float", val)?)),
    }
}

pub fn bool(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Bool(args.first().map_or(false, Value::is_truthy)))
}

pub fn abs(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Number(expect_number("abs", &args[0])?.abs()))
}

fn extreme(name: &str, args: &[Value], wanted: Ordering) -> Result<Value, String> {
    let candidates = match args {
        [Value::List(elements)] => elements.as_slice(),
        _ => args,
    };
    let mut best: Option<&Value> = None;
    for candidate in candidates {
        best = match best {
            None => Some(candidate),
            Some(current) => match value::compare(candidate, current) {
                Some(ordering) if ordering == wanted => Some(candidate),
                Some(_) => Some(current),
                None => {
                    return Err(format!(
                        "'{}' not supported between instances of '{}' and '{}'",
                        name,
                        value::type_of(candidate),
                        value::type_of(current)
                    ))
                }
            },
        };
    }
    best.cloned()
        .ok_or_else(|| format!("{}() arg is an empty sequence", name))
}

pub fn min(args: &[Value]) -> Result<Value, String> {
    extreme("min", args, Ordering::Less)
}

pub fn max(args: &[Value]) -> Result<Value, String> {
    extreme("max", args, Ordering::Greater)
}

pub fn sum(args: &[Value]) -> Result<Value, String> {
    match &args[0] {
        Value::List(elements) => {
            let mut total = 0.0;
            for element in elements {
                total += expect_number("sum", element)?;
            }
            Ok(Value::Number(total))
        }
        val => Err(format!(
            "'{}' object is not iterable",
            value::type_of(val)
        )),
    }
}

pub fn round(args: &[Value]) -> Result<Value, String> {
    let num = expect_number("round", &args[0])?;
    match args.get(1) {
        None | Some(Value::Nil) => Ok(Value::Number(num.round_ties_even())),
        Some(digits) => {
            let factor = 10f64.powi(expect_integer("round", digits)? as i32);
            Ok(Value::Number((num * factor).round_ties_even() / factor))
        }
    }
}

/// `range(stop)`, `range(start, stop)` or `range(start, stop, step)`,
/// materialized eagerly.
pub fn range(args: &[Value]) -> Result<Value, String> {
    let bounds = args
        .iter()
        .map(|arg| expect_integer("range", arg))
        .collect::<Result<Vec<i64>, String>>()?;
    let (start, stop, step) = match bounds.as_slice() {
        [stop] => (0, *stop, 1),
        [start, stop] => (*start, *stop, 1),
        [start, stop, step] => (*start, *stop, *step),
        _ => return Err(format!("range expected 1 to 3 arguments, got {}", bounds.len())),
    };
    if step == 0 {
        return Err("range() arg 3 must not be zero".to_string());
    }

    let (start, stop, step) = (i128::from(start), i128::from(stop), i128::from(step));
    let span = if step > 0 { stop - start } else { start - stop };
    let count = if span > 0 { (span - 1) / step.abs() + 1 } else { 0 };
    if count > value::MAX_SEQUENCE_LEN as i128 {
        return Err(format!("range() result has too many items ({})", count));
    }
    Ok(Value::List(
        (0..count)
            .map(|i| Value::Number((start + i * step) as f64))
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn numbers(values: &[i64]) -> Value {
        Value::List(values.iter().map(|n| Value::Number(*n as f64)).collect())
    }

    fn call_named(name: &str, args: &[Value]) -> Result<Value, String> {
        call(lookup(name).unwrap(), args)
    }

    #[test]
    fn test_range_forms() {
        assert_eq!(call_named("range", &[Value::Number(5.0)]), Ok(numbers(&[0, 1, 2, 3, 4])));
        assert_eq!(
            call_named("range", &[Value::Number(1.0), Value::Number(4.0)]),
            Ok(numbers(&[1, 2, 3]))
        );
        assert_eq!(
            call_named(
                "range",
                &[Value::Number(0.0), Value::Number(10.0), Value::Number(2.0)]
            ),
            Ok(numbers(&[0, 2, 4, 6, 8]))
        );
        assert_eq!(
            call_named(
                "range",
                &[Value::Number(3.0), Value::Number(0.0), Value::Number(-1.0)]
            ),
            Ok(numbers(&[3, 2, 1]))
        );
    }

    #[test]
    fn test_range_zero_step() {
        assert!(call_named(
            "range",
            &[Value::Number(0.0), Value::Number(3.0), Value::Number(0.0)]
        )
        .is_err());
    }

    #[test]
    fn test_range_near_integer_limits() {
        let top = i64::MAX as f64;
        assert_eq!(
            call_named(
                "range",
                &[Value::Number(top - 2048.0), Value::Number(top), Value::Number(1024.0)]
            ),
            Ok(Value::List(vec![
                Value::Number(top - 2048.0),
                Value::Number(top - 1024.0)
            ]))
        );
    }

    #[test]
    fn test_range_length_is_bounded() {
        let err = call_named("range", &[Value::Number(1e12)]).unwrap_err();
        assert_eq!(err, "range() result has too many items (1000000000000)");
    }

    #[test]
    fn test_arity_is_checked() {
        let err = call_named("len", &[]).unwrap_err();
        assert_eq!(err, "len() takes 1 argument(s) (0 given)");
    }

    #[test]
    fn test_min_max() {
        assert_eq!(
            call_named("min", &[Value::Number(3.0), Value::Number(1.0), Value::Number(2.0)]),
            Ok(Value::Number(1.0))
        );
        assert_eq!(call_named("max", &[numbers(&[4, 9, 2])]), Ok(Value::Number(9.0)));
        assert!(call_named("max", &[numbers(&[])]).is_err());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(call_named("int", &[Value::Str(" 42 ".into())]), Ok(Value::Number(42.0)));
        assert_eq!(call_named("int", &[Value::Number(3.9)]), Ok(Value::Number(3.0)));
        assert_eq!(call_named("float", &[Value::Str("2.5".into())]), Ok(Value::Number(2.5)));
        assert_eq!(call_named("str", &[Value::Bool(true)]), Ok(Value::Str("True".into())));
        assert!(call_named("int", &[Value::Str("abc".into())]).is_err());
    }

    #[test]
    fn test_round_half_to_even() {
        assert_eq!(call_named("round", &[Value::Number(2.5)]), Ok(Value::Number(2.0)));
        assert_eq!(
            call_named("round", &[Value::Number(3.14159), Value::Number(2.0)]),
            Ok(Value::Number(3.14))
        );
    }

    #[test]
    fn test_len_and_sum() {
        assert_eq!(call_named("len", &[Value::Str("héllo".into())]), Ok(Value::Number(5.0)));
        assert_eq!(call_named("sum", &[numbers(&[1, 2, 3])]), Ok(Value::Number(6.0)));
        assert!(call_named("len", &[Value::Number(1.0)]).is_err());
    }
}
