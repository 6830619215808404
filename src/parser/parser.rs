use crate::error::parser_error::Error;
use crate::parser::scanner::{self, Token, TokenType};
use crate::value::expr::{
    BinaryOp, BinaryOpTy, Expr, Literal, LogicalOp, Symbol, UnaryOp, UnaryOpTy,
};

#[derive(Default)]
struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

pub fn parse(tokens: Vec<Token>) -> Result<Expr, Error> {
    let mut p = Parser {
        tokens,
        ..Default::default()
    };
    let expr = p.expression()?;

    if !p.is_at_end() {
        let tok = &p.tokens[p.current];
        Err(Error::UnexpectedToken(tok.clone()))
    } else {
        Ok(expr)
    }
}

/*
Recursive descent using the following grammar

expression → or ;
or         → and ( "or" and )* ;
and        → not ( "and" not )* ;
not        → "not" not | comparison ;
comparison → sum ( ( "==" | "!=" | "<" | "<=" | ">" | ">=" | "in" | "not" "in" ) sum )* ;
sum        → product ( ( "+" | "-" ) product )* ;
product    → unary ( ( "*" | "/" | "//" | "%" ) unary )* ;
unary      → ( "-" | "+" ) unary | power ;
power      → postfix ( "**" unary )? ;
postfix    → primary ( "(" arguments? ")" | "[" expression "]" )* ;
arguments  → expression ( "," expression )* ","? ;
primary    → NUMBER | STRING | FSTRING | "True" | "False" | "None"
           | IDENTIFIER | "(" expression ")"
           | "[" ( expression ( "," expression )* ","? )? "]" ;
*/
impl Parser {
    fn expression(&mut self) -> Result<Expr, Error> {
        self.or()
    }

    fn or(&mut self) -> Result<Expr, Error> {
        let mut expr = self.and()?;

        while self.matches(TokenType::Or) {
            let right = self.and()?;
            expr = Expr::Logical(Box::new(expr), LogicalOp::Or, Box::new(right));
        }

        Ok(expr)
    }

    fn and(&mut self) -> Result<Expr, Error> {
        let mut expr = self.not()?;

        while self.matches(TokenType::And) {
            let right = self.not()?;
            expr = Expr::Logical(Box::new(expr), LogicalOp::And, Box::new(right));
        }

        Ok(expr)
    }

    fn not(&mut self) -> Result<Expr, Error> {
        if self.matches(TokenType::Not) {
            let operator_token = self.previous().clone();
            let right = Box::new(self.not()?);
            let unary_op = Parser::op_token_to_unary_op(&operator_token)?;
            return Ok(Expr::Unary(unary_op, right));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr, Error> {
        let expr = self.sum()?;
        let mut rest = Vec::new();

        loop {
            let binop = if self.check(TokenType::Not) && self.check_next(TokenType::In) {
                let col = self.advance().col;
                self.advance();
                BinaryOp {
                    ty: BinaryOpTy::NotIn,
                    col,
                }
            } else if self.match_one_of(&[
                TokenType::EqualEqual,
                TokenType::BangEqual,
                TokenType::Less,
                TokenType::LessEqual,
                TokenType::Greater,
                TokenType::GreaterEqual,
                TokenType::In,
            ]) {
                let operator_token = self.previous().clone();
                Parser::op_token_to_binop(&operator_token)?
            } else {
                break;
            };
            rest.push((binop, self.sum()?));
        }

        if rest.is_empty() {
            Ok(expr)
        } else {
            Ok(Expr::Comparison(Box::new(expr), rest))
        }
    }

    fn sum(&mut self) -> Result<Expr, Error> {
        let mut expr = self.product()?;

        while self.match_one_of(&[TokenType::Minus, TokenType::Plus]) {
            let operator_token = self.previous().clone();
            let right = Box::new(self.product()?);
            let binop = Parser::op_token_to_binop(&operator_token)?;
            expr = Expr::Binary(Box::new(expr), binop, right);
        }
        Ok(expr)
    }

    fn product(&mut self) -> Result<Expr, Error> {
        let mut expr = self.unary()?;

        while self.match_one_of(&[
            TokenType::Star,
            TokenType::Slash,
            TokenType::SlashSlash,
            TokenType::Percent,
        ]) {
            let operator_token = self.previous().clone();
            let right = Box::new(self.unary()?);
            let binop = Parser::op_token_to_binop(&operator_token)?;
            expr = Expr::Binary(Box::new(expr), binop, right);
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, Error> {
        if self.match_one_of(&[TokenType::Minus, TokenType::Plus]) {
            let operator_token = self.previous().clone();
            let right = Box::new(self.unary()?);
            let unary_op = Parser::op_token_to_unary_op(&operator_token)?;
            return Ok(Expr::Unary(unary_op, right));
        }
        self.power()
    }

    fn power(&mut self) -> Result<Expr, Error> {
        let expr = self.postfix()?;

        if self.matches(TokenType::StarStar) {
            let operator_token = self.previous().clone();
            // right associative: 2 ** 3 ** 2 == 2 ** 9
            let right = Box::new(self.unary()?);
            let binop = Parser::op_token_to_binop(&operator_token)?;
            return Ok(Expr::Binary(Box::new(expr), binop, right));
        }
        Ok(expr)
    }

    fn postfix(&mut self) -> Result<Expr, Error> {
        let mut expr = self.primary()?;

        loop {
            if self.matches(TokenType::LeftParen) {
                let callee = match expr {
                    Expr::Variable(sym) => sym,
                    _ => {
                        return Err(Error::InvalidCallee {
                            col: self.previous().col,
                        })
                    }
                };
                let arguments = self.finish_sequence(TokenType::RightParen, "Expected ) after arguments.")?;
                expr = Expr::Call(callee, arguments);
            } else if self.matches(TokenType::LeftBracket) {
                let col = self.previous().col;
                let slice_expr = self.expression()?;
                self.consume(TokenType::RightBracket, "Expected ] after subscript")?;
                expr = Expr::Subscript {
                    value: Box::new(expr),
                    slice: Box::new(slice_expr),
                    col,
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn finish_sequence(&mut self, close: TokenType, on_err_str: &str) -> Result<Vec<Expr>, Error> {
        let mut elements = Vec::new();

        if !self.check(close) {
            loop {
                elements.push(self.expression()?);
                if !self.matches(TokenType::Comma) || self.check(close) {
                    break;
                }
            }
        }

        self.consume(close, on_err_str)?;
        Ok(elements)
    }

    fn primary(&mut self) -> Result<Expr, Error> {
        if self.matches(TokenType::False) {
            return Ok(Expr::Literal(Literal::False));
        }
        if self.matches(TokenType::True) {
            return Ok(Expr::Literal(Literal::True));
        }
        if self.matches(TokenType::None) {
            return Ok(Expr::Literal(Literal::Nil));
        }
        if self.match_one_of(&[TokenType::Number, TokenType::String, TokenType::FString]) {
            let tok = self.previous();
            return match (&tok.ty, &tok.literal) {
                (TokenType::Number, Some(scanner::Literal::Number(n))) => {
                    Ok(Expr::Literal(Literal::Number(*n)))
                }
                (TokenType::String, Some(scanner::Literal::Str(s))) => {
                    Ok(Expr::Literal(Literal::Str(s.clone())))
                }
                (TokenType::FString, Some(scanner::Literal::Str(s))) => Ok(Expr::FString(s.clone())),
                _ => Err(Error::UnexpectedToken(tok.clone())),
            };
        }
        if self.matches(TokenType::Identifier) {
            let tok = self.previous();
            return match &tok.literal {
                Some(scanner::Literal::Identifier(name)) => Ok(Expr::Variable(Symbol {
                    name: name.clone(),
                    col: tok.col,
                })),
                _ => Err(Error::UnexpectedToken(tok.clone())),
            };
        }
        if self.matches(TokenType::LeftParen) {
            let expr = self.expression()?;
            self.consume(TokenType::RightParen, "Expected ')' after expression.")?;
            return Ok(expr);
        }
        if self.matches(TokenType::LeftBracket) {
            let elements = self.finish_sequence(TokenType::RightBracket, "Expected ] after list elements.")?;
            return Ok(Expr::List(elements));
        }

        Err(Error::ExpectedExpression {
            token_type: self.peek().ty,
            col: self.peek().col,
        })
    }

    fn consume(&mut self, tok: TokenType, on_err_str: &str) -> Result<&Token, Error> {
        if self.check(tok) {
            return Ok(self.advance());
        }
        Err(Error::TokenMismatch {
            expected: tok,
            found: self.peek().clone(),
            on_err: on_err_str.into(),
        })
    }

    fn op_token_to_unary_op(tok: &Token) -> Result<UnaryOp, Error> {
        let ty = match tok.ty {
            TokenType::Minus => UnaryOpTy::Minus,
            TokenType::Plus => UnaryOpTy::Plus,
            TokenType::Not => UnaryOpTy::Not,
            _ => {
                return Err(Error::InvalidTokenInUnaryOp {
                    token_type: tok.ty,
                    col: tok.col,
                })
            }
        };
        Ok(UnaryOp { ty, col: tok.col })
    }

    fn op_token_to_binop(tok: &Token) -> Result<BinaryOp, Error> {
        let ty = match tok.ty {
            TokenType::EqualEqual => BinaryOpTy::EqualEqual,
            TokenType::BangEqual => BinaryOpTy::NotEqual,
            TokenType::Less => BinaryOpTy::Less,
            TokenType::LessEqual => BinaryOpTy::LessEqual,
            TokenType::Greater => BinaryOpTy::Greater,
            TokenType::GreaterEqual => BinaryOpTy::GreaterEqual,
            TokenType::In => BinaryOpTy::In,
            TokenType::Plus => BinaryOpTy::Plus,
            TokenType::Minus => BinaryOpTy::Minus,
            TokenType::Star => BinaryOpTy::Star,
            TokenType::StarStar => BinaryOpTy::StarStar,
            TokenType::Slash => BinaryOpTy::Slash,
            TokenType::SlashSlash => BinaryOpTy::SlashSlash,
            TokenType::Percent => BinaryOpTy::Percent,
            _ => {
                return Err(Error::InvalidTokenInBinaryOp {
                    token_type: tok.ty,
                    col: tok.col,
                })
            }
        };
        Ok(BinaryOp { ty, col: tok.col })
    }

    fn match_one_of(&mut self, types: &[TokenType]) -> bool {
        for ty in types.iter() {
            if self.matches(*ty) {
                return true;
            }
        }
        false
    }

    fn matches(&mut self, ty: TokenType) -> bool {
        if self.check(ty) {
            self.advance();
            return true;
        }
        false
    }

    fn check(&self, ty: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().ty == ty
    }

    fn check_next(&self, ty: TokenType) -> bool {
        match self.tokens.get(self.current + 1) {
            Some(tok) => tok.ty == ty,
            None => false,
        }
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1
        }

        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().ty == TokenType::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::scanner::scan_tokens;
    use pretty_assertions::assert_eq;

    fn parse_str(input: &str) -> Result<Expr, Error> {
        parse(scan_tokens(input).unwrap())
    }

    fn num(n: f64) -> Expr {
        Expr::Literal(Literal::Number(n))
    }

    #[test]
    fn test_precedence() {
        let expr = parse_str("1 + 2 * 3").unwrap();
        match expr {
            Expr::Binary(lhs, op, rhs) => {
                assert_eq!(*lhs, num(1.0));
                assert_eq!(op.ty, BinaryOpTy::Plus);
                assert!(matches!(*rhs, Expr::Binary(_, BinaryOp { ty: BinaryOpTy::Star, .. }, _)));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_power_binds_tighter_than_unary_minus() {
        let expr = parse_str("-2 ** 2").unwrap();
        match expr {
            Expr::Unary(op, operand) => {
                assert_eq!(op.ty, UnaryOpTy::Minus);
                assert!(matches!(*operand, Expr::Binary(_, BinaryOp { ty: BinaryOpTy::StarStar, .. }, _)));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_not_in() {
        let expr = parse_str("x not in items").unwrap();
        match expr {
            Expr::Comparison(_, rest) => {
                assert_eq!(rest.len(), 1);
                assert_eq!(rest[0].0.ty, BinaryOpTy::NotIn);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_chained_comparison() {
        let expr = parse_str("1 < x <= 3").unwrap();
        match expr {
            Expr::Comparison(_, rest) => assert_eq!(rest.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_call_and_subscript() {
        let expr = parse_str("len(xs[0], 2,)").unwrap();
        match expr {
            Expr::Call(sym, args) => {
                assert_eq!(sym.name, "len");
                assert_eq!(args.len(), 2);
                assert!(matches!(args[0], Expr::Subscript { .. }));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_list_literal() {
        let expr = parse_str("[1, [2, 3]]").unwrap();
        match expr {
            Expr::List(elements) => {
                assert_eq!(elements[0], num(1.0));
                assert_eq!(elements[1], Expr::List(vec![num(2.0), num(3.0)]));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_trailing_tokens_are_rejected() {
        assert!(matches!(parse_str("1 2"), Err(Error::UnexpectedToken(_))));
    }

    #[test]
    fn test_missing_operand() {
        assert!(matches!(
            parse_str("1 +"),
            Err(Error::ExpectedExpression { token_type: TokenType::Eof, .. })
        ));
    }

    #[test]
    fn test_unclosed_paren() {
        assert!(matches!(
            parse_str("(1 + 2"),
            Err(Error::TokenMismatch { expected: TokenType::RightParen, .. })
        ));
    }

    #[test]
    fn test_only_names_are_callable() {
        assert!(matches!(parse_str("'f'(1)"), Err(Error::InvalidCallee { .. })));
    }
}
