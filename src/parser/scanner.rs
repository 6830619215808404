use crate::error::scanner_error::Error;

#[derive(Eq, PartialEq, Debug, Copy, Clone)]
pub enum TokenType {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Comma,
    Plus,
    Minus,
    Percent,

    // One or two character tokens.
    Star,
    StarStar,
    Slash,
    SlashSlash,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // Literals.
    Identifier,
    String,
    FString,
    Number,

    // Keywords.
    And,
    Or,
    Not,
    In,
    True,
    False,
    None,

    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Identifier(String),
    Str(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub ty: TokenType,
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub col: usize,
}

pub fn scan_tokens(input: &str) -> Result<Vec<Token>, Error> {
    let mut scanner = Scanner {
        source: input.chars().collect(),
        ..Default::default()
    };
    scanner.scan_tokens()?;
    Ok(scanner.tokens)
}

/// Resolves the backslash escapes Python programs commonly use. Unknown
/// escapes are kept as written.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn keyword(ident: &str) -> Option<TokenType> {
    match ident {
        "and" => Some(TokenType::And),
        "or" => Some(TokenType::Or),
        "not" => Some(TokenType::Not),
        "in" => Some(TokenType::In),
        "True" => Some(TokenType::True),
        "False" => Some(TokenType::False),
        "None" => Some(TokenType::None),
        _ => None,
    }
}

#[derive(Default)]
struct Scanner {
    source: Vec<char>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
}

impl Scanner {
    fn scan_tokens(&mut self) -> Result<(), Error> {
        while !self.done() {
            self.start = self.current;
            self.scan_token()?;
        }

        self.tokens.push(Token {
            ty: TokenType::Eof,
            lexeme: String::new(),
            literal: None,
            col: self.current,
        });
        Ok(())
    }

    fn scan_token(&mut self) -> Result<(), Error> {
        let c = self.advance();

        match c {
            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            '[' => self.add_token(TokenType::LeftBracket),
            ']' => self.add_token(TokenType::RightBracket),
            ',' => self.add_token(TokenType::Comma),
            '+' => self.add_token(TokenType::Plus),
            '-' => self.add_token(TokenType::Minus),
            '%' => self.add_token(TokenType::Percent),
            '*' => {
                let matches_star = self.matches('*');
                self.add_token(if matches_star {
                    TokenType::StarStar
                } else {
                    TokenType::Star
                })
            }
            '/' => {
                let matches_slash = self.matches('/');
                self.add_token(if matches_slash {
                    TokenType::SlashSlash
                } else {
                    TokenType::Slash
                })
            }
            '!' => {
                if self.matches('=') {
                    self.add_token(TokenType::BangEqual)
                } else {
                    return Err(self.error("unexpected character '!'"));
                }
            }
            '=' => {
                if self.matches('=') {
                    self.add_token(TokenType::EqualEqual)
                } else {
                    return Err(self.error("assignment is not allowed inside an expression"));
                }
            }
            '<' => {
                let matches_eq = self.matches('=');
                self.add_token(if matches_eq {
                    TokenType::LessEqual
                } else {
                    TokenType::Less
                })
            }
            '>' => {
                let matches_eq = self.matches('=');
                self.add_token(if matches_eq {
                    TokenType::GreaterEqual
                } else {
                    TokenType::Greater
                })
            }
            ' ' | '\r' | '\t' => {}
            '"' | '\'' => self.string(c, TokenType::String)?,
            'f' | 'F' if matches!(self.peek(), '"' | '\'') => {
                let quote = self.advance();
                self.string(quote, TokenType::FString)?
            }
            _ => {
                if c.is_ascii_digit() || (c == '.' && self.peek().is_ascii_digit()) {
                    self.number()?
                } else if c.is_alphabetic() || c == '_' {
                    self.identifier()
                } else {
                    return Err(self.error(&format!("unexpected character '{}'", c)));
                }
            }
        }
        Ok(())
    }

    fn identifier(&mut self) {
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let literal_val = self.lexeme();
        match keyword(&literal_val) {
            Some(token_type) => self.add_token(token_type),
            None => {
                self.add_token_literal(TokenType::Identifier, Some(Literal::Identifier(literal_val)))
            }
        }
    }

    fn number(&mut self) -> Result<(), Error> {
        while self.peek().is_ascii_digit() || self.peek() == '_' {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        } else if self.peek() == '.' {
            // `5.` is a valid float literal
            self.advance();
        }

        if matches!(self.peek(), 'e' | 'E')
            && (self.peek_next().is_ascii_digit() || matches!(self.peek_next(), '+' | '-'))
        {
            self.advance();
            if matches!(self.peek(), '+' | '-') {
                self.advance();
            }
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let text = self.lexeme().replace('_', "");
        match text.parse::<f64>() {
            Ok(val) => {
                self.add_token_literal(TokenType::Number, Some(Literal::Number(val)));
                Ok(())
            }
            Err(_) => Err(self.error(&format!("invalid number literal '{}'", text))),
        }
    }

    fn string(&mut self, quote: char, ty: TokenType) -> Result<(), Error> {
        let content_start = self.current;
        while !self.done() && self.peek() != quote {
            if self.peek() == '\\' {
                self.advance();
            }
            if !self.done() {
                self.advance();
            }
        }

        if self.done() {
            return Err(self.error("unterminated string"));
        }

        let raw: String = self.source[content_start..self.current].iter().collect();
        self.advance();

        let val = match ty {
            // f-string placeholders are resolved against the scope later
            TokenType::FString => raw,
            _ => unescape(&raw),
        };
        self.add_token_literal(ty, Some(Literal::Str(val)));
        Ok(())
    }

    fn error(&self, what: &str) -> Error {
        Error {
            what: what.to_string(),
            col: self.start,
        }
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    fn add_token(&mut self, token_type: TokenType) {
        self.add_token_literal(token_type, None)
    }

    fn add_token_literal(&mut self, token_type: TokenType, literal: Option<Literal>) {
        self.tokens.push(Token {
            ty: token_type,
            lexeme: self.lexeme(),
            literal,
            col: self.start,
        })
    }

    fn peek(&self) -> char {
        self.source.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.source.get(self.current + 1).copied().unwrap_or('\0')
    }

    fn matches(&mut self, c: char) -> bool {
        if self.done() || self.peek() != c {
            return false;
        }

        self.current += 1;
        true
    }

    fn advance(&mut self) -> char {
        self.current += 1;
        self.source[self.current - 1]
    }

    fn done(&self) -> bool {
        self.current >= self.source.len()
    }
}
