use std::cmp::Ordering;

use tracing::debug;

use super::{print, splitter, util};
use crate::builtins;
use crate::error::Error;
use crate::parser::{self, scanner};
use crate::value::expr::{BinaryOpTy, Expr, Literal, LogicalOp, Symbol, UnaryOpTy};
use crate::value::scope::Scope;
use crate::value::{self, type_of, Value};

/// Outcome of evaluating expression text. A failed evaluation keeps the
/// original text so callers can degrade in place.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Value(Value),
    Fallback(String),
}

impl Evaluation {
    pub fn into_value(self) -> Value {
        match self {
            Evaluation::Value(val) => val,
            Evaluation::Fallback(text) => Value::Str(text),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Evaluation::Fallback(_))
    }
}

pub fn evaluate(text: &str, scope: &Scope) -> Evaluation {
    let text = text.trim();

    if let Some(val) = string_literal(text, scope) {
        return Evaluation::Value(val);
    }

    match text {
        "True" => return Evaluation::Value(Value::Bool(true)),
        "False" => return Evaluation::Value(Value::Bool(false)),
        "None" => return Evaluation::Value(Value::Nil),
        _ => {}
    }

    if util::is_identifier(text) {
        if let Some(val) = scope.get(text) {
            return Evaluation::Value(val.clone());
        }
    }

    if let Some(("range", args)) = util::split_call(text) {
        return match range(args, scope) {
            Ok(val) => Evaluation::Value(val),
            Err(err) => fallback(text, &err),
        };
    }

    if util::is_enclosed(text, '[', ']') {
        let elements = splitter::split_arguments(&text[1..text.len() - 1])
            .into_iter()
            .map(|element| evaluate(element, scope).into_value())
            .collect();
        return Evaluation::Value(Value::List(elements));
    }

    match evaluate_strict(text, scope) {
        Ok(val) => Evaluation::Value(val),
        Err(err) => fallback(text, &err),
    }
}

fn fallback(text: &str, err: &Error) -> Evaluation {
    debug!(expression = text, error = %err, "expression fell back to its source text");
    Evaluation::Fallback(text.to_string())
}

/// A single string or f-string literal spanning the whole text.
fn string_literal(text: &str, scope: &Scope) -> Option<Value> {
    let tokens = scanner::scan_tokens(text).ok()?;
    match tokens.as_slice() {
        [token, eof] if eof.ty == scanner::TokenType::Eof => match (&token.ty, &token.literal) {
            (scanner::TokenType::String, Some(scanner::Literal::Str(s))) => {
                Some(Value::Str(s.clone()))
            }
            (scanner::TokenType::FString, Some(scanner::Literal::Str(raw))) => {
                Some(Value::Str(print::interpolate(&scanner::unescape(raw), scope)))
            }
            _ => None,
        },
        _ => None,
    }
}

fn range(args: &str, scope: &Scope) -> Result<Value, Error> {
    let bounds = splitter::split_arguments(args)
        .into_iter()
        .map(|arg| evaluate_strict(arg, scope))
        .collect::<Result<Vec<_>, _>>()?;
    let builtin = builtins::lookup("range")
        .ok_or_else(|| Error::Runtime("name 'range' is not defined".to_string()))?;
    Ok(builtins::call(builtin, &bounds)?)
}

/// Parses and evaluates without degrading. Used for conditions, augmented
/// assignment and anything else that must not silently become text.
pub fn evaluate_strict(text: &str, scope: &Scope) -> Result<Value, Error> {
    let expr = parser::parse_expression(text)?;
    Evaluator { scope }.eval(&expr)
}

pub fn evaluate_condition(text: &str, scope: &Scope) -> Result<bool, Error> {
    evaluate_strict(text, scope).map(|val| val.is_truthy())
}

struct Evaluator<'a> {
    scope: &'a Scope,
}

impl Evaluator<'_> {
    fn eval(&self, expr: &Expr) -> Result<Value, Error> {
        match expr {
            Expr::Literal(lit) => Ok(match lit {
                Literal::Number(n) => Value::Number(*n),
                Literal::Str(s) => Value::Str(s.clone()),
                Literal::True => Value::Bool(true),
                Literal::False => Value::Bool(false),
                Literal::Nil => Value::Nil,
            }),
            Expr::FString(raw) => Ok(Value::Str(print::interpolate(
                &scanner::unescape(raw),
                self.scope,
            ))),
            Expr::Variable(sym) => self
                .scope
                .get(&sym.name)
                .cloned()
                .ok_or_else(|| Error::Runtime(format!("name '{}' is not defined", sym.name))),
            Expr::List(elements) => elements
                .iter()
                .map(|element| self.eval(element))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Expr::Unary(op, operand) => unary(op.ty, self.eval(operand)?),
            Expr::Binary(lhs, op, rhs) => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                binary(op.ty, &lhs, &rhs)
            }
            Expr::Comparison(first, rest) => {
                let mut lhs = self.eval(first)?;
                for (op, rhs_expr) in rest {
                    let rhs = self.eval(rhs_expr)?;
                    if !compare_values(op.ty, &lhs, &rhs)? {
                        return Ok(Value::Bool(false));
                    }
                    lhs = rhs;
                }
                Ok(Value::Bool(true))
            }
            Expr::Logical(lhs, op, rhs) => {
                let lhs = self.eval(lhs)?;
                match (op, lhs.is_truthy()) {
                    (LogicalOp::And, false) | (LogicalOp::Or, true) => Ok(lhs),
                    _ => self.eval(rhs),
                }
            }
            Expr::Call(callee, args) => self.call(callee, args),
            Expr::Subscript { value, slice, .. } => {
                let val = self.eval(value)?;
                let index = self.eval(slice)?;
                subscript(&val, &index)
            }
        }
    }

    fn call(&self, callee: &Symbol, args: &[Expr]) -> Result<Value, Error> {
        match self.scope.get(&callee.name) {
            Some(Value::Function(name)) => {
                return Err(Error::Runtime(format!(
                    "function '{}' can only be called as a statement",
                    name
                )))
            }
            Some(val) => {
                return Err(Error::Runtime(format!(
                    "'{}' object is not callable",
                    type_of(val)
                )))
            }
            None => {}
        }

        let builtin = builtins::lookup(&callee.name)
            .ok_or_else(|| Error::Runtime(format!("name '{}' is not defined", callee.name)))?;
        let args = args
            .iter()
            .map(|arg| self.eval(arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(builtins::call(builtin, &args)?)
    }
}

fn unary(op: UnaryOpTy, val: Value) -> Result<Value, Error> {
    match op {
        UnaryOpTy::Not => Ok(Value::Bool(!val.is_truthy())),
        UnaryOpTy::Minus | UnaryOpTy::Plus => match val.as_number() {
            Some(n) if op == UnaryOpTy::Minus => Ok(Value::Number(-n)),
            Some(n) => Ok(Value::Number(n)),
            None => Err(Error::Runtime(format!(
                "bad operand type for unary {}: '{}'",
                if op == UnaryOpTy::Minus { "-" } else { "+" },
                type_of(&val)
            ))),
        },
    }
}

pub fn binary(op: BinaryOpTy, lhs: &Value, rhs: &Value) -> Result<Value, Error> {
    match op {
        BinaryOpTy::Plus => match (lhs, rhs) {
            (Value::Str(s1), Value::Str(s2)) => Ok(Value::Str(format!("{}{}", s1, s2))),
            (Value::List(l1), Value::List(l2)) => {
                Ok(Value::List(l1.iter().chain(l2.iter()).cloned().collect()))
            }
            _ => numeric(op, lhs, rhs, |a, b| Ok(a + b)),
        },
        BinaryOpTy::Star => match (lhs, rhs) {
            (Value::Str(s), count) | (count, Value::Str(s)) if count.as_number().is_some() => {
                Ok(Value::Str(s.repeat(repeat_count(count, s.len())?)))
            }
            (Value::List(elements), count) | (count, Value::List(elements))
                if count.as_number().is_some() =>
            {
                let times = repeat_count(count, elements.len())?;
                Ok(Value::List(
                    std::iter::repeat(elements.iter())
                        .take(times)
                        .flatten()
                        .cloned()
                        .collect(),
                ))
            }
            _ => numeric(op, lhs, rhs, |a, b| Ok(a * b)),
        },
        BinaryOpTy::Minus => numeric(op, lhs, rhs, |a, b| Ok(a - b)),
        BinaryOpTy::Slash => numeric(op, lhs, rhs, |a, b| {
            if b == 0.0 {
                Err(Error::Runtime("division by zero".to_string()))
            } else {
                Ok(a / b)
            }
        }),
        BinaryOpTy::SlashSlash => numeric(op, lhs, rhs, |a, b| {
            if b == 0.0 {
                Err(Error::Runtime("integer division or modulo by zero".to_string()))
            } else {
                Ok((a / b).floor())
            }
        }),
        BinaryOpTy::Percent => numeric(op, lhs, rhs, |a, b| {
            if b == 0.0 {
                Err(Error::Runtime("integer division or modulo by zero".to_string()))
            } else {
                Ok(a - b * (a / b).floor())
            }
        }),
        BinaryOpTy::StarStar => numeric(op, lhs, rhs, |a, b| Ok(a.powf(b))),
        BinaryOpTy::EqualEqual
        | BinaryOpTy::NotEqual
        | BinaryOpTy::Less
        | BinaryOpTy::LessEqual
        | BinaryOpTy::Greater
        | BinaryOpTy::GreaterEqual
        | BinaryOpTy::In
        | BinaryOpTy::NotIn => compare_values(op, lhs, rhs).map(Value::Bool),
    }
}

fn numeric(
    op: BinaryOpTy,
    lhs: &Value,
    rhs: &Value,
    f: impl Fn(f64, f64) -> Result<f64, Error>,
) -> Result<Value, Error> {
    match (lhs.as_number(), rhs.as_number()) {
        (Some(n1), Some(n2)) => f(n1, n2).map(Value::Number),
        _ => Err(Error::Runtime(format!(
            "unsupported operand type(s) for {}: '{}' and '{}'",
            op.symbol(),
            type_of(lhs),
            type_of(rhs)
        ))),
    }
}

/// How many times a sequence of `len` items is repeated by `count`.
fn repeat_count(count: &Value, len: usize) -> Result<usize, Error> {
    match count.as_number() {
        Some(_) if len == 0 => Ok(0),
        Some(n) if n.fract() == 0.0 => {
            let times = n.max(0.0) as usize;
            match len.checked_mul(times) {
                Some(total) if total <= value::MAX_SEQUENCE_LEN => Ok(times),
                _ => Err(Error::Runtime("repeated sequence is too long".to_string())),
            }
        }
        _ => Err(Error::Runtime(format!(
            "can't multiply sequence by non-int of type '{}'",
            type_of(count)
        ))),
    }
}

pub fn compare_values(op: BinaryOpTy, lhs: &Value, rhs: &Value) -> Result<bool, Error> {
    let ordering = |wanted: fn(Ordering) -> bool| {
        value::compare(lhs, rhs).map(wanted).ok_or_else(|| {
            Error::Runtime(format!(
                "'{}' not supported between instances of '{}' and '{}'",
                op.symbol(),
                type_of(lhs),
                type_of(rhs)
            ))
        })
    };

    match op {
        BinaryOpTy::EqualEqual => Ok(value::values_equal(lhs, rhs)),
        BinaryOpTy::NotEqual => Ok(!value::values_equal(lhs, rhs)),
        BinaryOpTy::Less => ordering(Ordering::is_lt),
        BinaryOpTy::LessEqual => ordering(Ordering::is_le),
        BinaryOpTy::Greater => ordering(Ordering::is_gt),
        BinaryOpTy::GreaterEqual => ordering(Ordering::is_ge),
        BinaryOpTy::In => contains(rhs, lhs),
        BinaryOpTy::NotIn => contains(rhs, lhs).map(|found| !found),
        _ => Err(Error::Runtime(format!(
            "'{}' is not a comparison",
            op.symbol()
        ))),
    }
}

fn contains(container: &Value, item: &Value) -> Result<bool, Error> {
    match (container, item) {
        (Value::List(elements), _) => Ok(elements.iter().any(|element| value::values_equal(element, item))),
        (Value::Str(haystack), Value::Str(needle)) => Ok(haystack.contains(needle.as_str())),
        (Value::Str(_), _) => Err(Error::Runtime(format!(
            "'in <string>' requires string as left operand, not {}",
            type_of(item)
        ))),
        _ => Err(Error::Runtime(format!(
            "argument of type '{}' is not iterable",
            type_of(container)
        ))),
    }
}

pub fn subscript(val: &Value, index: &Value) -> Result<Value, Error> {
    let position = |len: usize| -> Result<usize, Error> {
        match index {
            Value::Number(n) => Ok(value::subscript_to_inbound_index(len, *n)?),
            _ => Err(Error::Runtime(format!(
                "{} indices must be integers, not '{}'",
                type_of(val),
                type_of(index)
            ))),
        }
    };

    match val {
        Value::List(elements) => Ok(elements[position(elements.len())?].clone()),
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            Ok(Value::Str(chars[position(chars.len())?].to_string()))
        }
        _ => Err(Error::Runtime(format!(
            "'{}' object is not subscriptable",
            type_of(val)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scope_with(bindings: &[(&str, Value)]) -> Scope {
        let mut scope = Scope::new();
        for (name, val) in bindings {
            scope.define(*name, val.clone());
        }
        scope
    }

    fn value_of(text: &str, scope: &Scope) -> Value {
        match evaluate(text, scope) {
            Evaluation::Value(val) => val,
            Evaluation::Fallback(text) => panic!("fell back on {}", text),
        }
    }

    fn number_list(values: &[f64]) -> Value {
        Value::List(values.iter().map(|n| Value::Number(*n)).collect())
    }

    #[test]
    fn test_literals() {
        let scope = Scope::new();
        assert_eq!(value_of("'hi'", &scope), Value::Str("hi".to_string()));
        assert_eq!(value_of("\"a\\nb\"", &scope), Value::Str("a\nb".to_string()));
        assert_eq!(value_of("True", &scope), Value::Bool(true));
        assert_eq!(value_of("None", &scope), Value::Nil);
        assert_eq!(value_of("2.5", &scope), Value::Number(2.5));
    }

    #[test]
    fn test_ranges() {
        let scope = scope_with(&[("n", Value::Number(3.0))]);
        assert_eq!(value_of("range(1,4)", &scope), number_list(&[1.0, 2.0, 3.0]));
        assert_eq!(value_of("range(n)", &scope), number_list(&[0.0, 1.0, 2.0]));
        assert_eq!(
            value_of("range(0, 10, 2)", &scope),
            number_list(&[0.0, 2.0, 4.0, 6.0, 8.0])
        );
        assert!(evaluate("range(0, 3, 0)", &scope).is_fallback());
    }

    #[test]
    fn test_list_elements_degrade_individually() {
        let scope = scope_with(&[("x", Value::Number(1.0))]);
        assert_eq!(
            value_of("[x, 'a, b', min(4, 2), y + 1]", &scope),
            Value::List(vec![
                Value::Number(1.0),
                Value::Str("a, b".to_string()),
                Value::Number(2.0),
                Value::Str("y + 1".to_string()),
            ])
        );
    }

    #[test]
    fn test_arithmetic() {
        let scope = scope_with(&[("x", Value::Number(7.0))]);
        assert_eq!(value_of("x // 2", &scope), Value::Number(3.0));
        assert_eq!(value_of("-7 // 2", &scope), Value::Number(-4.0));
        assert_eq!(value_of("-7 % 3", &scope), Value::Number(2.0));
        assert_eq!(value_of("x / 2", &scope), Value::Number(3.5));
        assert_eq!(value_of("2 ** 3 ** 2", &scope), Value::Number(512.0));
        assert_eq!(value_of("-2 ** 2", &scope), Value::Number(-4.0));
        assert_eq!(value_of("True + 1", &scope), Value::Number(2.0));
    }

    #[test]
    fn test_sequences() {
        let scope = scope_with(&[("name", Value::Str("ab".to_string()))]);
        assert_eq!(value_of("name * 2 + '!'", &scope), Value::Str("abab!".to_string()));
        assert_eq!(value_of("[1] * 2 + [3]", &scope), number_list(&[1.0, 1.0, 3.0]));
        assert_eq!(value_of("name[-1]", &scope), Value::Str("b".to_string()));
        assert_eq!(value_of("'a' in name", &scope), Value::Bool(true));
        assert_eq!(value_of("3 not in [1, 2]", &scope), Value::Bool(true));
    }

    #[test]
    fn test_logic_returns_operands() {
        let scope = Scope::new();
        assert_eq!(value_of("0 or 'x'", &scope), Value::Str("x".to_string()));
        assert_eq!(value_of("'' and 1", &scope), Value::Str(String::new()));
        assert_eq!(value_of("not 0", &scope), Value::Bool(true));
        assert_eq!(value_of("1 < 2 < 3", &scope), Value::Bool(true));
        assert_eq!(value_of("3 > 2 > 2", &scope), Value::Bool(false));
    }

    #[test]
    fn test_failures_fall_back_to_text() {
        let scope = scope_with(&[("f", Value::Function("f".to_string()))]);
        assert_eq!(
            evaluate("1 / 0", &scope),
            Evaluation::Fallback("1 / 0".to_string())
        );
        assert_eq!(
            evaluate("undefined + 1", &scope),
            Evaluation::Fallback("undefined + 1".to_string())
        );
        assert_eq!(
            evaluate("f(1)", &scope),
            Evaluation::Fallback("f(1)".to_string())
        );
        assert_eq!(
            evaluate("'a' - 1", &scope),
            Evaluation::Fallback("'a' - 1".to_string())
        );
    }

    #[test]
    fn test_strict_evaluation_reports_errors() {
        let scope = Scope::new();
        let err = evaluate_strict("missing > 1", &scope).unwrap_err();
        assert_eq!(err.to_string(), "name 'missing' is not defined");
        let err = evaluate_condition("1 < 'a'", &scope).unwrap_err();
        assert_eq!(
            err.to_string(),
            "'<' not supported between instances of 'int' and 'str'"
        );
        assert_eq!(evaluate_condition("[]", &scope), Ok(false));
    }

    #[test]
    fn test_fstring_in_expression() {
        let scope = scope_with(&[("n", Value::Number(4.0))]);
        assert_eq!(
            value_of("f'n={n}' + '!'", &scope),
            Value::Str("n=4!".to_string())
        );
    }
}
