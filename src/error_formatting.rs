use colored::*;
use pylite::InterpreterError;

use crate::input;

fn format_input(input: &input::Input, line: usize) -> String {
    let mut out = format!("in {}, at line {}:\n", input.name(), line);
    if let Some(text) = input.content.lines().nth(line.saturating_sub(1)) {
        let indent = text.chars().take_while(|c| c.is_whitespace()).count();
        let width = text.trim().chars().count().max(1);
        out.push_str(text);
        out.push('\n');
        out.push_str(&" ".repeat(indent));
        out.push_str(&"^".repeat(width).as_str().blue().bold().to_string());
        out.push('\n');
    }
    out
}

pub fn format_interpreter_error(err: &InterpreterError, input: &input::Input) -> String {
    let kind = match err {
        InterpreterError::Syntax { .. } => "syntax error",
        InterpreterError::Runtime { .. } => "runtime error",
    };
    format!(
        "pylite: {}: {}\n{}",
        kind.red().bold(),
        err.what().white().bold(),
        format_input(input, err.line())
    )
}
