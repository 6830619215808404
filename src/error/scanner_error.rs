use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{what} at col {col}")]
pub struct Error {
    pub what: String,
    pub col: usize,
}
