use std::fmt::Display;

use crate::Span;

use super::{statements::BlockStmt, types::BasicKind, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg, // -
    Not, // !
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Not => write!(f, "!"),
        }
    }
}

/// Arithmetic and comparison operators. Short-circuiting `&&`/`||` are kept
/// apart as `LogicalOp` since their evaluation order differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl BinOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge
        )
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl Display for LogicalOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicalOp::And => write!(f, "&&"),
            LogicalOp::Or => write!(f, "||"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    Ident(IdentExpr),
    Int(IntLitExpr),
    Bool(BoolLitExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Logical(LogicalExpr),
    FnLit(FnLitExpr),
}

impl Expr {
    pub fn id(&self) -> NodeId {
        match self {
            Expr::Ident(e) => e.id,
            Expr::Int(e) => e.id,
            Expr::Bool(e) => e.id,
            Expr::Unary(e) => e.id,
            Expr::Binary(e) => e.id,
            Expr::Logical(e) => e.id,
            Expr::FnLit(e) => e.id,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Expr::Ident(e) => &e.span,
            Expr::Int(e) => &e.span,
            Expr::Bool(e) => &e.span,
            Expr::Unary(e) => &e.span,
            Expr::Binary(e) => &e.span,
            Expr::Logical(e) => &e.span,
            Expr::FnLit(e) => &e.span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IdentExpr {
    pub id: NodeId,
    pub name: String,
    pub span: Span,
}

/// Integer literal. Carried unsigned as lexed; the checker interprets it
/// through the untyped-constant rules.
#[derive(Debug, Clone)]
pub struct IntLitExpr {
    pub id: NodeId,
    pub value: u64,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BoolLitExpr {
    pub id: NodeId,
    pub value: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub id: NodeId,
    pub op: UnaryOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub id: NodeId,
    pub op: BinOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct LogicalExpr {
    pub id: NodeId,
    pub op: LogicalOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub kind: BasicKind,
}

/// Function literal. Parsed in full so its syntax is validated, but the
/// checker currently rejects it as not implemented.
#[derive(Debug, Clone)]
pub struct FnLitExpr {
    pub id: NodeId,
    pub params: Vec<Param>,
    pub results: Vec<BasicKind>,
    pub body: BlockStmt,
    pub span: Span,
}
