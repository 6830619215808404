pub mod parser;
pub mod scanner;

use crate::error;
use crate::value::expr::Expr;

/// Scans and parses a single expression.
pub fn parse_expression(input: &str) -> Result<Expr, error::Error> {
    let tokens = scanner::scan_tokens(input)?;
    Ok(parser::parse(tokens)?)
}
