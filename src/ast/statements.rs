use crate::Span;

use super::{expressions::Expr, types::BasicKind, NodeId};

#[derive(Debug, Clone)]
pub enum Stmt {
    VarDecl(VarDeclStmt),
    Assign(AssignStmt),
    If(IfStmt),
    For(ForStmt),
    Block(BlockStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
    Return(ReturnStmt),
    Expr(ExprStmt),
    Empty(EmptyStmt),
}

impl Stmt {
    pub fn id(&self) -> NodeId {
        match self {
            Stmt::VarDecl(s) => s.id,
            Stmt::Assign(s) => s.id,
            Stmt::If(s) => s.id,
            Stmt::For(s) => s.id,
            Stmt::Block(s) => s.id,
            Stmt::Break(s) => s.id,
            Stmt::Continue(s) => s.id,
            Stmt::Return(s) => s.id,
            Stmt::Expr(s) => s.id,
            Stmt::Empty(s) => s.id,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Stmt::VarDecl(s) => &s.span,
            Stmt::Assign(s) => &s.span,
            Stmt::If(s) => &s.span,
            Stmt::For(s) => &s.span,
            Stmt::Block(s) => &s.span,
            Stmt::Break(s) => &s.span,
            Stmt::Continue(s) => &s.span,
            Stmt::Return(s) => &s.span,
            Stmt::Expr(s) => &s.span,
            Stmt::Empty(s) => &s.span,
        }
    }
}

/// `var a, b int32 = 1, 2`. At least one of `declared` and `inits` is
/// present; the parser rejects `var x` with neither.
#[derive(Debug, Clone)]
pub struct VarDeclStmt {
    pub id: NodeId,
    pub names: Vec<String>,
    pub declared: Option<BasicKind>,
    pub inits: Vec<Expr>,
    pub span: Span,
}

/// `a, b = x, y` or, with `define`, `a, b := x, y`. Targets are always
/// identifier expressions; the parser enforces that for `:=` and the checker
/// for `=`. Increment statements desugar into this node.
#[derive(Debug, Clone)]
pub struct AssignStmt {
    pub id: NodeId,
    pub targets: Vec<Expr>,
    pub values: Vec<Expr>,
    pub define: bool,
    pub span: Span,
}

/// An if/else-if chain: `branches` holds each condition with its block in
/// source order, then the optional trailing else block.
#[derive(Debug, Clone)]
pub struct IfStmt {
    pub id: NodeId,
    pub branches: Vec<(Expr, BlockStmt)>,
    pub else_block: Option<BlockStmt>,
    pub span: Span,
}

/// All three loop forms share this node: infinite (`for {`), condition-only
/// (`for x < 3 {`) and full (`for i := 0; i < 3; i++ {`). The statement's own
/// id keys the loop-header scope holding variables declared by `init`.
#[derive(Debug, Clone)]
pub struct ForStmt {
    pub id: NodeId,
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub post: Option<Box<Stmt>>,
    pub body: BlockStmt,
    pub span: Span,
}

/// A braced statement list. The block's id keys its parked scope, so the
/// same syntactic block reuses one scope across executions.
#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub id: NodeId,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BreakStmt {
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ContinueStmt {
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub id: NodeId,
    pub values: Vec<Expr>,
    pub span: Span,
}

/// A bare expression statement. `echo` is set unless the expression was
/// immediately followed by `;`, and makes the driver surface the value.
#[derive(Debug, Clone)]
pub struct ExprStmt {
    pub id: NodeId,
    pub expr: Expr,
    pub echo: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct EmptyStmt {
    pub id: NodeId,
    pub span: Span,
}
