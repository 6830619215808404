use std::cmp::Ordering;
use std::fmt::Display;

use itertools::Itertools;

pub mod expr;
pub mod functions;
pub mod scope;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Number(f64),
    Bool(bool),
    List(Vec<Value>),
    Nil,
    // Placeholder for a name in the function registry, not the callable itself.
    Function(String),
}

impl Value {
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Number(n) => *n != 0.0,
            Value::Bool(b) => *b,
            Value::List(elements) => !elements.is_empty(),
            Value::Nil => false,
            Value::Function(_) => true,
        }
    }

    /// Numeric view of the value. Booleans count as 0 and 1.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// The form a value takes when it is an element of a printed list.
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => {
                if s.contains('\'') && !s.contains('"') {
                    format!("\"{}\"", s)
                } else {
                    format!("'{}'", s.replace('\'', "\\'"))
                }
            }
            other => other.to_string(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{}", s),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::List(elements) => {
                write!(f, "[{}]", elements.iter().map(Value::repr).join(", "))
            }
            Value::Nil => write!(f, "None"),
            Value::Function(name) => write!(f, "<function {}>", name),
        }
    }
}

pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "nan".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "inf" } else { "-inf" }.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e16 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Type {
    Str,
    Int,
    Float,
    Bool,
    List,
    NoneType,
    Function,
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Str => write!(f, "str"),
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Bool => write!(f, "bool"),
            Type::List => write!(f, "list"),
            Type::NoneType => write!(f, "NoneType"),
            Type::Function => write!(f, "function"),
        }
    }
}

pub fn type_of(value: &Value) -> Type {
    match value {
        Value::Str(_) => Type::Str,
        Value::Number(n) if n.fract() == 0.0 => Type::Int,
        Value::Number(_) => Type::Float,
        Value::Bool(_) => Type::Bool,
        Value::List(_) => Type::List,
        Value::Nil => Type::NoneType,
        Value::Function(_) => Type::Function,
    }
}

pub fn values_equal(val1: &Value, val2: &Value) -> bool {
    match (val1, val2) {
        (Value::Str(s1), Value::Str(s2)) => s1 == s2,
        (Value::List(l1), Value::List(l2)) => {
            l1.len() == l2.len() && l1.iter().zip(l2.iter()).all(|(a, b)| values_equal(a, b))
        }
        (Value::Nil, Value::Nil) => true,
        (Value::Function(f1), Value::Function(f2)) => f1 == f2,
        (lhs, rhs) => match (lhs.as_number(), rhs.as_number()) {
            (Some(n1), Some(n2)) => n1 == n2,
            _ => false,
        },
    }
}

/// Ordering for `<`, `min` and friends. `None` means the pair is not comparable.
pub fn compare(val1: &Value, val2: &Value) -> Option<Ordering> {
    match (val1, val2) {
        (Value::Str(s1), Value::Str(s2)) => Some(s1.cmp(s2)),
        (Value::List(l1), Value::List(l2)) => {
            for (a, b) in l1.iter().zip(l2.iter()) {
                match compare(a, b)? {
                    Ordering::Equal => continue,
                    unequal => return Some(unequal),
                }
            }
            Some(l1.len().cmp(&l2.len()))
        }
        (lhs, rhs) => match (lhs.as_number(), rhs.as_number()) {
            (Some(n1), Some(n2)) => n1.partial_cmp(&n2),
            _ => None,
        },
    }
}

/// Longest string or list that repetition or `range` may build.
pub const MAX_SEQUENCE_LEN: usize = 1 << 24;

pub fn subscript_to_inbound_index(list_len: usize, index_float: f64) -> Result<usize, String> {
    if index_float.fract() != 0.0 {
        return Err("list indices must be integers".to_string());
    }
    let len = list_len as f64;
    if 0.0 <= index_float && index_float < len {
        return Ok(index_float as usize);
    }
    if index_float < 0.0 && -index_float <= len {
        return Ok((len + index_float) as usize);
    }
    Err("list index out of range".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(f64::INFINITY), "inf");
    }

    #[test]
    fn test_list_display_quotes_strings() {
        let list = Value::List(vec![
            Value::Number(1.0),
            Value::Str("a".to_string()),
            Value::Bool(true),
            Value::Nil,
        ]);
        assert_eq!(list.to_string(), "[1, 'a', True, None]");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
        assert!(!Value::List(vec![]).is_truthy());
        assert!(!Value::Nil.is_truthy());
        assert!(Value::Str("0".to_string()).is_truthy());
    }

    #[test]
    fn test_bool_equals_number() {
        assert!(values_equal(&Value::Bool(true), &Value::Number(1.0)));
        assert!(!values_equal(&Value::Str("1".to_string()), &Value::Number(1.0)));
    }

    #[test]
    fn test_compare_mixed_types() {
        assert_eq!(compare(&Value::Number(1.0), &Value::Number(2.0)), Some(Ordering::Less));
        assert_eq!(compare(&Value::Str("b".into()), &Value::Str("a".into())), Some(Ordering::Greater));
        assert_eq!(compare(&Value::Str("a".into()), &Value::Number(1.0)), None);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(type_of(&Value::Number(2.0)).to_string(), "int");
        assert_eq!(type_of(&Value::Number(2.5)).to_string(), "float");
        assert_eq!(type_of(&Value::Nil).to_string(), "NoneType");
    }

    #[test]
    fn test_negative_subscripts() {
        assert_eq!(subscript_to_inbound_index(3, -1.0), Ok(2));
        assert!(subscript_to_inbound_index(3, 3.0).is_err());
        assert!(subscript_to_inbound_index(3, -4.0).is_err());
    }

    #[test]
    fn test_huge_subscripts_are_out_of_range() {
        let out_of_range = Err("list index out of range".to_string());
        assert_eq!(subscript_to_inbound_index(1, -1e19), out_of_range);
        assert_eq!(subscript_to_inbound_index(1, 1e19), out_of_range);
        assert_eq!(subscript_to_inbound_index(0, -0.0), out_of_range);
        assert!(subscript_to_inbound_index(1, f64::NEG_INFINITY).is_err());
    }
}
