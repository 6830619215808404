use thiserror::Error;

pub mod parser_error;
pub mod scanner_error;

/// Failure while scanning, parsing or evaluating a single expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("lexical error: {0}")]
    Lexical(#[from] scanner_error::Error),
    #[error("parse error: {0}")]
    Parse(#[from] parser_error::Error),
    #[error("{0}")]
    Runtime(String),
}

impl From<String> for Error {
    fn from(what: String) -> Self {
        Error::Runtime(what)
    }
}
