#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    FString(String),
    Variable(Symbol),
    List(Vec<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Binary(Box<Expr>, BinaryOp, Box<Expr>),
    // `a < b <= c` keeps every operator so each pair is compared once
    Comparison(Box<Expr>, Vec<(BinaryOp, Expr)>),
    Logical(Box<Expr>, LogicalOp, Box<Expr>),
    Call(Symbol, Vec<Expr>),
    Subscript {
        value: Box<Expr>,
        slice: Box<Expr>,
        col: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Str(String),
    True,
    False,
    Nil,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub col: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOpTy {
    Minus,
    Plus,
    Not,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UnaryOp {
    pub ty: UnaryOpTy,
    pub col: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOpTy {
    EqualEqual,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    In,
    NotIn,
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    SlashSlash,
    Percent,
}

impl BinaryOpTy {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOpTy::EqualEqual => "==",
            BinaryOpTy::NotEqual => "!=",
            BinaryOpTy::Less => "<",
            BinaryOpTy::LessEqual => "<=",
            BinaryOpTy::Greater => ">",
            BinaryOpTy::GreaterEqual => ">=",
            BinaryOpTy::In => "in",
            BinaryOpTy::NotIn => "not in",
            BinaryOpTy::Plus => "+",
            BinaryOpTy::Minus => "-",
            BinaryOpTy::Star => "*",
            BinaryOpTy::StarStar => "**",
            BinaryOpTy::Slash => "/",
            BinaryOpTy::SlashSlash => "//",
            BinaryOpTy::Percent => "%",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BinaryOp {
    pub ty: BinaryOpTy,
    pub col: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}
