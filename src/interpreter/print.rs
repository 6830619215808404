use itertools::Itertools;

use super::eval::evaluate;
use super::{splitter, util};
use crate::parser::scanner::{self, Literal, TokenType};
use crate::value::scope::Scope;

/// Renders the arguments of a `print(...)` call as one output line.
pub fn render(arguments: &str, scope: &Scope) -> String {
    splitter::split_arguments(arguments)
        .into_iter()
        .map(|arg| match fstring_body(arg) {
            Some(template) => interpolate(&scanner::unescape(&template), scope),
            None => evaluate(arg, scope).into_value().to_string(),
        })
        .join(" ")
}

/// The raw body of `arg` when the whole argument is one f-string literal.
pub fn fstring_body(arg: &str) -> Option<String> {
    let tokens = scanner::scan_tokens(arg).ok()?;
    match tokens.as_slice() {
        [token, eof] if token.ty == TokenType::FString && eof.ty == TokenType::Eof => {
            match &token.literal {
                Some(Literal::Str(raw)) => Some(raw.clone()),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Replaces `{name}` placeholders with the textual form of the bound value.
/// Placeholders that are not bound identifiers stay as written, and `{{` and
/// `}}` produce literal braces.
pub fn interpolate(template: &str, scope: &Scope) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(|c: char| c == '{' || c == '}') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
            continue;
        }

        match tail.find('}') {
            Some(close) => {
                let name = tail[1..close].trim();
                match scope.get(name) {
                    Some(val) if util::is_identifier(name) => out.push_str(&val.to_string()),
                    _ => out.push_str(&tail[..=close]),
                }
                rest = &tail[close + 1..];
            }
            None => {
                out.push_str(tail);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    fn scope() -> Scope {
        let mut scope = Scope::new();
        scope.define("x", Value::Number(5.0));
        scope.define("name", Value::Str("Ada".to_string()));
        scope.define(
            "xs",
            Value::List(vec![Value::Number(1.0), Value::Str("a".to_string())]),
        );
        scope
    }

    #[test]
    fn test_multiple_arguments_join_with_space() {
        assert_eq!(render("1, \"x\", 2", &scope()), "1 x 2");
        assert_eq!(render("min(1,2), 3", &scope()), "1 3");
        assert_eq!(render("", &scope()), "");
    }

    #[test]
    fn test_textual_forms() {
        assert_eq!(render("True, None, 10 / 2, 7 / 2", &scope()), "True None 5 3.5");
        assert_eq!(render("xs", &scope()), "[1, 'a']");
    }

    #[test]
    fn test_fstring_interpolation() {
        assert_eq!(render("f\"{x}\"", &scope()), "5");
        assert_eq!(render("f'Hi {name}, x={x}'", &scope()), "Hi Ada, x=5");
        assert_eq!(render("f'{x}', x", &scope()), "5 5");
    }

    #[test]
    fn test_unknown_placeholders_stay_verbatim() {
        assert_eq!(interpolate("{missing} {x + 1}", &scope()), "{missing} {x + 1}");
        assert_eq!(interpolate("{{x}} {x}", &scope()), "{x} 5");
        assert_eq!(interpolate("open {x", &scope()), "open {x");
    }

    #[test]
    fn test_fallback_prints_source_text() {
        assert_eq!(render("y * 2", &scope()), "y * 2");
    }
}
