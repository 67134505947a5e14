//! Pretty-printing of AST nodes back to source text.
//!
//! Printed output is parseable: feeding it back through the parser yields an
//! equivalent tree, and printing that tree again reproduces the text.
//! Parentheses are inserted only where precedence or associativity needs
//! them.

use std::fmt::{self, Display, Formatter};

use super::{
    expressions::{BinOp, Expr, LogicalOp},
    statements::{BlockStmt, Stmt},
};

const INDENT: &str = "    ";

/// Binding strength used to decide parenthesization; primaries bind
/// tightest.
fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Logical(e) => match e.op {
            LogicalOp::Or => 1,
            LogicalOp::And => 2,
        },
        Expr::Binary(e) => {
            if e.op.is_comparison() {
                3
            } else {
                match e.op {
                    BinOp::Add | BinOp::Sub => 4,
                    _ => 5,
                }
            }
        }
        Expr::Unary(_) => 6,
        _ => 7,
    }
}

fn fmt_child(f: &mut Formatter<'_>, child: &Expr, wrap: bool) -> fmt::Result {
    if wrap {
        write!(f, "({})", child)
    } else {
        write!(f, "{}", child)
    }
}

fn fmt_exprs(f: &mut Formatter<'_>, exprs: &[Expr]) -> fmt::Result {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", expr)?;
    }
    Ok(())
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(e) => write!(f, "{}", e.name),
            Expr::Int(e) => write!(f, "{}", e.value),
            Expr::Bool(e) => write!(f, "{}", e.value),
            Expr::Unary(e) => {
                write!(f, "{}", e.op)?;
                // Non-primary operands are wrapped so -(-x) does not print
                // as the decrement token and -(a * b) keeps its tree.
                fmt_child(f, &e.operand, precedence(&e.operand) < 7)
            }
            Expr::Binary(e) => {
                let level = precedence(self);
                fmt_child(f, &e.left, precedence(&e.left) < level)?;
                write!(f, " {} ", e.op)?;
                fmt_child(f, &e.right, precedence(&e.right) <= level)
            }
            Expr::Logical(e) => {
                let level = precedence(self);
                fmt_child(f, &e.left, precedence(&e.left) < level)?;
                write!(f, " {} ", e.op)?;
                fmt_child(f, &e.right, precedence(&e.right) <= level)
            }
            Expr::FnLit(e) => {
                write!(f, "func(")?;
                for (i, param) in e.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} {}", param.name, param.kind)?;
                }
                write!(f, ")")?;
                match e.results.len() {
                    0 => {}
                    1 => write!(f, " {}", e.results[0])?,
                    _ => {
                        write!(f, " (")?;
                        for (i, kind) in e.results.iter().enumerate() {
                            if i > 0 {
                                write!(f, ", ")?;
                            }
                            write!(f, "{}", kind)?;
                        }
                        write!(f, ")")?;
                    }
                }
                write!(f, " ")?;
                fmt_block(&e.body, f, 0)
            }
        }
    }
}

fn fmt_block(block: &BlockStmt, f: &mut Formatter<'_>, indent: usize) -> fmt::Result {
    writeln!(f, "{{")?;
    for stmt in &block.body {
        if !matches!(stmt, Stmt::Empty(_)) {
            for _ in 0..=indent {
                write!(f, "{}", INDENT)?;
            }
            fmt_stmt(stmt, f, indent + 1)?;
        }
        writeln!(f)?;
    }
    for _ in 0..indent {
        write!(f, "{}", INDENT)?;
    }
    write!(f, "}}")
}

fn fmt_stmt(stmt: &Stmt, f: &mut Formatter<'_>, indent: usize) -> fmt::Result {
    match stmt {
        Stmt::VarDecl(s) => {
            write!(f, "var {}", s.names.join(", "))?;
            if let Some(kind) = s.declared {
                write!(f, " {}", kind)?;
            }
            if !s.inits.is_empty() {
                write!(f, " = ")?;
                fmt_exprs(f, &s.inits)?;
            }
            Ok(())
        }
        Stmt::Assign(s) => {
            fmt_exprs(f, &s.targets)?;
            write!(f, "{}", if s.define { " := " } else { " = " })?;
            fmt_exprs(f, &s.values)
        }
        Stmt::If(s) => {
            for (i, (cond, block)) in s.branches.iter().enumerate() {
                if i == 0 {
                    write!(f, "if {} ", cond)?;
                } else {
                    write!(f, " else if {} ", cond)?;
                }
                fmt_block(block, f, indent)?;
            }
            if let Some(block) = &s.else_block {
                write!(f, " else ")?;
                fmt_block(block, f, indent)?;
            }
            Ok(())
        }
        Stmt::For(s) => {
            write!(f, "for ")?;
            match (&s.init, &s.cond, &s.post) {
                (None, None, None) => {}
                (None, Some(cond), None) => write!(f, "{} ", cond)?,
                _ => {
                    if let Some(init) = &s.init {
                        fmt_stmt(init, f, indent)?;
                    }
                    write!(f, "; ")?;
                    if let Some(cond) = &s.cond {
                        write!(f, "{}", cond)?;
                    }
                    write!(f, ";")?;
                    if let Some(post) = &s.post {
                        write!(f, " ")?;
                        fmt_stmt(post, f, indent)?;
                    }
                    write!(f, " ")?;
                }
            }
            fmt_block(&s.body, f, indent)
        }
        Stmt::Block(s) => fmt_block(s, f, indent),
        Stmt::Break(_) => write!(f, "break"),
        Stmt::Continue(_) => write!(f, "continue"),
        Stmt::Return(s) => {
            write!(f, "return")?;
            if !s.values.is_empty() {
                write!(f, " ")?;
                fmt_exprs(f, &s.values)?;
            }
            Ok(())
        }
        Stmt::Expr(s) => {
            write!(f, "{}", s.expr)?;
            if !s.echo {
                write!(f, ";")?;
            }
            Ok(())
        }
        Stmt::Empty(_) => Ok(()),
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt_stmt(self, f, 0)
    }
}

impl Display for BlockStmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt_block(self, f, 0)
    }
}
