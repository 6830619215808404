use thiserror::Error;

use crate::parser::scanner::{Token, TokenType};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("unexpected token {:?} at col {}", .0.ty, .0.col)]
    UnexpectedToken(Token),
    #[error("expected token {expected:?} but found {:?} at col {}: {on_err}", .found.ty, .found.col)]
    TokenMismatch {
        expected: TokenType,
        found: Token,
        on_err: String,
    },
    #[error("expected expression, but found token {token_type:?} at col {col}")]
    ExpectedExpression { token_type: TokenType, col: usize },
    #[error("invalid token in unary op {token_type:?} at col {col}")]
    InvalidTokenInUnaryOp { token_type: TokenType, col: usize },
    #[error("invalid token in binary op {token_type:?} at col {col}")]
    InvalidTokenInBinaryOp { token_type: TokenType, col: usize },
    #[error("only named functions can be called (col {col})")]
    InvalidCallee { col: usize },
}
