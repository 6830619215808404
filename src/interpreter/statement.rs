use super::{splitter, util};
use crate::value::expr::BinaryOpTy;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'a> {
    Print(&'a str),
    FunctionDef {
        name: &'a str,
        params: Vec<&'a str>,
    },
    Assign {
        target: AssignTarget<'a>,
        op: Option<BinaryOpTy>,
        value: &'a str,
    },
    If(&'a str),
    Else,
    Elif(&'a str),
    For {
        variable: &'a str,
        iterable: &'a str,
    },
    While(&'a str),
    Call {
        name: &'a str,
        args: &'a str,
    },
    Return(Option<&'a str>),
    Break,
    Continue,
    Pass,
    Append {
        list: &'a str,
        value: &'a str,
    },
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignTarget<'a> {
    Name(&'a str),
    Subscript { name: &'a str, index: &'a str },
}

/// Classifies one stripped, non-blank line. The checks run in a fixed
/// priority order, so `print(...)` wins over the generic call form and an
/// assignment wins over anything with a keyword prefix.
pub fn classify(text: &str) -> Result<Statement<'_>, String> {
    if let Some(("print", args)) = util::split_call(text) {
        return Ok(Statement::Print(args));
    }
    if let Some(rest) = keyword_rest(text, "def") {
        return function_def(rest);
    }
    if let Some(assign) = assignment(text)? {
        return Ok(assign);
    }
    if let Some(condition) = header(text, "if")? {
        return Ok(Statement::If(non_empty(condition, "if")?));
    }
    if let Some(rest) = header(text, "else")? {
        if !rest.is_empty() {
            return Err("'else' does not take a condition".to_string());
        }
        return Ok(Statement::Else);
    }
    if let Some(condition) = header(text, "elif")? {
        return Ok(Statement::Elif(non_empty(condition, "elif")?));
    }
    if let Some(rest) = header(text, "for")? {
        return for_loop(rest);
    }
    if let Some(condition) = header(text, "while")? {
        return Ok(Statement::While(non_empty(condition, "while")?));
    }
    if let Some((name, args)) = util::split_call(text) {
        return Ok(Statement::Call { name, args });
    }
    if let Some(rest) = keyword_rest(text, "return") {
        return Ok(Statement::Return(Some(rest).filter(|r| !r.is_empty())));
    }
    match text {
        "break" => return Ok(Statement::Break),
        "continue" => return Ok(Statement::Continue),
        "pass" => return Ok(Statement::Pass),
        _ => {}
    }
    if let Some(append) = append_call(text) {
        return Ok(append);
    }
    Ok(Statement::Unrecognized)
}

/// The text after a leading keyword, when the keyword is a whole word.
fn keyword_rest<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(keyword)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_alphanumeric() || c == '_' => None,
        Some(_) => Some(rest.trim()),
    }
}

/// `keyword ... :` with the colon removed.
fn header<'a>(text: &'a str, keyword: &str) -> Result<Option<&'a str>, String> {
    let rest = match keyword_rest(text, keyword) {
        Some(rest) => rest,
        None => return Ok(None),
    };
    match rest.strip_suffix(':') {
        Some(body) => Ok(Some(body.trim())),
        None => Err(format!("expected ':' at the end of the '{}' statement", keyword)),
    }
}

fn non_empty<'a>(condition: &'a str, keyword: &str) -> Result<&'a str, String> {
    if condition.is_empty() {
        Err(format!("expected a condition after '{}'", keyword))
    } else {
        Ok(condition)
    }
}

fn function_def(rest: &str) -> Result<Statement<'_>, String> {
    let signature = rest
        .strip_suffix(':')
        .ok_or_else(|| "expected ':' at the end of the function definition".to_string())?
        .trim();
    let (name, params) =
        util::split_call(signature).ok_or_else(|| "invalid function definition".to_string())?;

    let params = splitter::split_arguments(params)
        .into_iter()
        .map(|param| {
            if util::is_identifier(param) {
                Ok(param)
            } else if param.contains('=') {
                Err("default parameter values are not supported".to_string())
            } else {
                Err(format!("invalid parameter name '{}'", param))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Statement::FunctionDef { name, params })
}

fn for_loop(rest: &str) -> Result<Statement<'_>, String> {
    let (variable, iterable) = rest
        .split_once(" in ")
        .ok_or_else(|| "expected 'in' in the 'for' statement".to_string())?;
    let variable = variable.trim();
    let iterable = iterable.trim();
    if !util::is_identifier(variable) {
        return Err(format!("invalid loop variable '{}'", variable));
    }
    if iterable.is_empty() {
        return Err("expected an iterable after 'in'".to_string());
    }
    Ok(Statement::For { variable, iterable })
}

fn assignment(text: &str) -> Result<Option<Statement<'_>>, String> {
    let bytes = text.as_bytes();
    let mut skip_next = false;
    for (idx, c, depth) in util::structural(text) {
        if c != '=' || depth != 0 {
            continue;
        }
        if skip_next {
            skip_next = false;
            continue;
        }
        if bytes.get(idx + 1) == Some(&b'=') {
            skip_next = true;
            continue;
        }
        if idx > 0 && matches!(bytes[idx - 1], b'!' | b'<' | b'>') {
            continue;
        }

        let (lhs_end, op) = augmented_op(&text[..idx]);
        let target = match assign_target(text[..lhs_end].trim()) {
            Some(target) => target,
            None => return Ok(None),
        };
        let value = text[idx + 1..].trim();
        if value.is_empty() {
            return Err("expected an expression after '='".to_string());
        }
        return Ok(Some(Statement::Assign { target, op, value }));
    }
    Ok(None)
}

fn augmented_op(lhs: &str) -> (usize, Option<BinaryOpTy>) {
    const OPERATORS: &[(&str, BinaryOpTy)] = &[
        ("//", BinaryOpTy::SlashSlash),
        ("**", BinaryOpTy::StarStar),
        ("+", BinaryOpTy::Plus),
        ("-", BinaryOpTy::Minus),
        ("*", BinaryOpTy::Star),
        ("/", BinaryOpTy::Slash),
        ("%", BinaryOpTy::Percent),
    ];
    for (symbol, op) in OPERATORS {
        if lhs.ends_with(symbol) {
            return (lhs.len() - symbol.len(), Some(*op));
        }
    }
    (lhs.len(), None)
}

fn assign_target(lhs: &str) -> Option<AssignTarget<'_>> {
    if util::is_identifier(lhs) {
        return Some(AssignTarget::Name(lhs));
    }
    let open = lhs.find('[')?;
    let name = lhs[..open].trim();
    let subscript = &lhs[open..];
    if !util::is_identifier(name) || !util::is_enclosed(subscript, '[', ']') {
        return None;
    }
    Some(AssignTarget::Subscript {
        name,
        index: subscript[1..subscript.len() - 1].trim(),
    })
}

fn append_call(text: &str) -> Option<Statement<'_>> {
    let (list, call) = text.split_once('.')?;
    let list = list.trim();
    if !util::is_identifier(list) {
        return None;
    }
    match util::split_call(call.trim()) {
        Some(("append", value)) => Some(Statement::Append {
            list,
            value: value.trim(),
        }),
        _ => None,
    }
}
