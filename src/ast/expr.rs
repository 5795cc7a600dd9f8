use super::{Block, Identifier};
use crate::lexer::Token;

/// Unary operators. `PREFIX`-precedence parselets only ever produce these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    Not,
    Negate,
}

/// Binary operators recognised by infix parselets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    LessThan,
    GreaterThan,
    Equal,
    NotEqual,
}

impl InfixOp {
    /// The source spelling, used both by the `Display` impl below and by runtime error messages
    /// such as `"type mismatch: LEFT op RIGHT"`.
    pub fn as_str(self) -> &'static str {
        match self {
            InfixOp::Add => "+",
            InfixOp::Subtract => "-",
            InfixOp::Multiply => "*",
            InfixOp::Divide => "/",
            InfixOp::Modulo => "%",
            InfixOp::LessThan => "<",
            InfixOp::GreaterThan => ">",
            InfixOp::Equal => "==",
            InfixOp::NotEqual => "!=",
        }
    }
}

impl std::fmt::Display for InfixOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PrefixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            PrefixOp::Not => "!",
            PrefixOp::Negate => "-",
        }
    }
}

impl std::fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfExpr {
    pub token: Token,
    pub condition: Box<Expr>,
    pub consequence: Block,
    pub alternative: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub token: Token,
    pub params: Vec<Identifier>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub token: Token,
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    pub token: Token,
    pub left: Box<Expr>,
    pub index: Box<Expr>,
}

/// Every expression-position AST node. Each variant carries the [`Token`] it was parsed from
/// so diagnostics and runtime errors can point back at source.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(Identifier),
    IntegerLiteral { token: Token, value: i64 },
    StringLiteral { token: Token, value: String },
    BooleanLiteral { token: Token, value: bool },
    NullLiteral { token: Token },
    Prefix { token: Token, op: PrefixOp, right: Box<Expr> },
    Infix { token: Token, left: Box<Expr>, op: InfixOp, right: Box<Expr> },
    If(IfExpr),
    Function(FunctionLiteral),
    Call(CallExpr),
    ArrayLiteral { token: Token, elements: Vec<Expr> },
    Index(IndexExpr),
}

impl Expr {
    pub fn token(&self) -> &Token {
        match self {
            Expr::Identifier(ident) => &ident.token,
            Expr::IntegerLiteral { token, .. } => token,
            Expr::StringLiteral { token, .. } => token,
            Expr::BooleanLiteral { token, .. } => token,
            Expr::NullLiteral { token } => token,
            Expr::Prefix { token, .. } => token,
            Expr::Infix { token, .. } => token,
            Expr::If(IfExpr { token, .. }) => token,
            Expr::Function(FunctionLiteral { token, .. }) => token,
            Expr::Call(CallExpr { token, .. }) => token,
            Expr::ArrayLiteral { token, .. } => token,
            Expr::Index(IndexExpr { token, .. }) => token,
        }
    }
}
