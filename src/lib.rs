use serde::Serialize;

pub mod builtins;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod value;

pub use config::Config;
pub use interpreter::{Interpreter, InterpreterError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// Result of one run, in the shape the CLI prints with `--json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub status: Status,
    /// Printed lines joined by newlines, or `Error: <message>`.
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl RunReport {
    pub fn from_outcome(printed: &[String], outcome: &Result<(), InterpreterError>) -> RunReport {
        match outcome {
            Ok(()) => RunReport {
                status: Status::Ok,
                output: printed.join("\n"),
                line: None,
            },
            Err(err) => RunReport {
                status: Status::Error,
                output: format!("Error: {}", err),
                line: Some(err.line()),
            },
        }
    }
}

/// Runs `source` in a fresh interpreter and returns everything it printed,
/// one line per `print`. A failing program yields `Error: <message>` and
/// nothing it printed before the failure.
pub fn run(source: &str) -> String {
    run_with(source, Config::default())
}

pub fn run_with(source: &str, config: Config) -> String {
    let mut interp = Interpreter::new(config);
    let outcome = interp.interpret(source);
    RunReport::from_outcome(&interp.output, &outcome).output
}
