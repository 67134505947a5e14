use crate::{
    ast::{
        expressions::{BinOp, BinaryExpr, Expr, IdentExpr, IntLitExpr},
        statements::{
            AssignStmt, BlockStmt, BreakStmt, ContinueStmt, EmptyStmt, ExprStmt, ForStmt, IfStmt,
            ReturnStmt, Stmt, VarDeclStmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Position, Span,
};

use super::{expr::parse_expr, parser::Parser, types::parse_type_opt};

/// Parses one statement, dispatching on the leading token. Every statement
/// consumes its own terminator: an optional `;` followed by a mandatory
/// newline.
pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    match parser.cursor.peek_kind()? {
        TokenKind::Newline => {
            let token = parser.cursor.advance()?;
            Ok(Stmt::Empty(EmptyStmt {
                id: parser.advance_id(),
                span: token.span,
            }))
        }
        TokenKind::Semicolon => {
            let token = parser.cursor.advance()?;
            parser.cursor.expect(&TokenKind::Newline)?;
            Ok(Stmt::Empty(EmptyStmt {
                id: parser.advance_id(),
                span: token.span,
            }))
        }
        TokenKind::Var => {
            let stmt = parse_var_decl_stmt(parser)?;
            finish_stmt(parser, stmt)
        }
        TokenKind::If => {
            let stmt = parse_if_stmt(parser)?;
            finish_stmt(parser, stmt)
        }
        TokenKind::For => {
            let stmt = parse_for_stmt(parser)?;
            finish_stmt(parser, stmt)
        }
        TokenKind::OpenCurly => {
            let block = parse_block_stmt(parser)?;
            finish_stmt(parser, Stmt::Block(block))
        }
        TokenKind::Break => {
            let token = parser.cursor.advance()?;
            let stmt = Stmt::Break(BreakStmt {
                id: parser.advance_id(),
                span: token.span,
            });
            finish_stmt(parser, stmt)
        }
        TokenKind::Continue => {
            let token = parser.cursor.advance()?;
            let stmt = Stmt::Continue(ContinueStmt {
                id: parser.advance_id(),
                span: token.span,
            });
            finish_stmt(parser, stmt)
        }
        TokenKind::Return => {
            let stmt = parse_return_stmt(parser)?;
            finish_stmt(parser, stmt)
        }
        _ => {
            let stmt = parse_simple_stmt(parser)?;
            let stmt = match stmt {
                Stmt::Expr(mut s) => {
                    // A trailing `;` suppresses the echo of a bare
                    // expression statement.
                    s.echo = !parser.cursor.at(&TokenKind::Semicolon)?;
                    Stmt::Expr(s)
                }
                other => other,
            };
            finish_stmt(parser, stmt)
        }
    }
}

fn finish_stmt(parser: &mut Parser, stmt: Stmt) -> Result<Stmt, Error> {
    parser.cursor.eat(&TokenKind::Semicolon)?;
    parser.cursor.expect(&TokenKind::Newline)?;
    Ok(stmt)
}

/// A "simple" statement: the forms allowed in for-loop clauses. Covers bare
/// expressions, assignments, short declarations and the increment and
/// decrement forms, which desugar into ordinary assignments.
pub fn parse_simple_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let first = parse_expr(parser)?;
    let start = first.span().start.clone();

    match parser.cursor.peek_kind()? {
        TokenKind::PlusPlus | TokenKind::MinusMinus => {
            let op_token = parser.cursor.advance()?;
            desugar_increment(parser, first, op_token.kind, start)
        }
        TokenKind::Comma | TokenKind::Assign | TokenKind::Define => {
            parse_assign_stmt(parser, first, start)
        }
        _ => {
            let span = Span {
                start,
                end: first.span().end.clone(),
            };
            Ok(Stmt::Expr(ExprStmt {
                id: parser.advance_id(),
                expr: first,
                echo: true,
                span,
            }))
        }
    }
}

/// Rewrites `i++` / `i--` into `i = i + 1` / `i = i - 1`.
fn desugar_increment(
    parser: &mut Parser,
    target: Expr,
    op_kind: TokenKind,
    start: Position,
) -> Result<Stmt, Error> {
    let Expr::Ident(ident) = target else {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: op_kind.to_string(),
                message: String::from("only an identifier can be incremented"),
            },
            start,
        ));
    };

    let op = if op_kind == TokenKind::PlusPlus {
        BinOp::Add
    } else {
        BinOp::Sub
    };
    let end = parser.cursor.position()?;
    let span = Span {
        start: start.clone(),
        end,
    };

    let read = Expr::Ident(IdentExpr {
        id: parser.advance_id(),
        name: ident.name.clone(),
        span: ident.span.clone(),
    });
    let one = Expr::Int(IntLitExpr {
        id: parser.advance_id(),
        value: 1,
        span: span.clone(),
    });
    let value = Expr::Binary(BinaryExpr {
        id: parser.advance_id(),
        op,
        left: Box::new(read),
        right: Box::new(one),
        span: span.clone(),
    });

    Ok(Stmt::Assign(AssignStmt {
        id: parser.advance_id(),
        targets: vec![Expr::Ident(ident)],
        values: vec![value],
        define: false,
        span,
    }))
}

fn parse_assign_stmt(parser: &mut Parser, first: Expr, start: Position) -> Result<Stmt, Error> {
    let mut targets = vec![first];
    while parser.cursor.eat(&TokenKind::Comma)? {
        targets.push(parse_expr(parser)?);
    }

    let define = match parser.cursor.peek_kind()? {
        TokenKind::Define => true,
        TokenKind::Assign => false,
        _ => {
            let token = parser.cursor.peek()?;
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: token.to_string(),
                    message: String::from("expected `=` or `:=` after assignment targets"),
                },
                token.span.start.clone(),
            ));
        }
    };
    parser.cursor.advance()?;

    if define {
        for target in &targets {
            if !matches!(target, Expr::Ident(_)) {
                return Err(Error::new(
                    ErrorImpl::UnexpectedTokenDetailed {
                        token: String::from(":="),
                        message: String::from("only identifiers can be declared with `:=`"),
                    },
                    target.span().start.clone(),
                ));
            }
        }
    }

    let mut values = vec![parse_expr(parser)?];
    while parser.cursor.eat(&TokenKind::Comma)? {
        values.push(parse_expr(parser)?);
    }

    let end = parser.cursor.position()?;
    Ok(Stmt::Assign(AssignStmt {
        id: parser.advance_id(),
        targets,
        values,
        define,
        span: Span { start, end },
    }))
}

fn expect_identifier(parser: &mut Parser, context: &str) -> Result<String, Error> {
    let token = parser
        .cursor
        .expect_message(&TokenKind::Identifier(String::new()), Some(context))?;
    match token.kind {
        TokenKind::Identifier(name) => Ok(name),
        _ => Err(Error::new(
            ErrorImpl::Internal {
                message: String::from("identifier expectation matched a non-identifier"),
            },
            token.span.start,
        )),
    }
}

fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.cursor.advance()?.span.start;

    let mut names = vec![expect_identifier(
        parser,
        "expected an identifier after `var`",
    )?];
    while parser.cursor.eat(&TokenKind::Comma)? {
        names.push(expect_identifier(
            parser,
            "expected an identifier after `,`",
        )?);
    }

    let declared = parse_type_opt(parser)?;

    let mut inits = vec![];
    if parser.cursor.eat(&TokenKind::Assign)? {
        inits.push(parse_expr(parser)?);
        while parser.cursor.eat(&TokenKind::Comma)? {
            inits.push(parse_expr(parser)?);
        }
    }

    if declared.is_none() && inits.is_empty() {
        let token = parser.cursor.peek()?;
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.to_string(),
                message: String::from("a declaration needs a type or an initializer"),
            },
            token.span.start.clone(),
        ));
    }

    let end = parser.cursor.position()?;
    Ok(Stmt::VarDecl(VarDeclStmt {
        id: parser.advance_id(),
        names,
        declared,
        inits,
        span: Span { start, end },
    }))
}

fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.cursor.advance()?.span.start;

    let mut branches = vec![];
    let cond = parse_expr(parser)?;
    branches.push((cond, parse_block_stmt(parser)?));

    let mut else_block = None;
    while parser.cursor.eat(&TokenKind::Else)? {
        if parser.cursor.eat(&TokenKind::If)? {
            let cond = parse_expr(parser)?;
            branches.push((cond, parse_block_stmt(parser)?));
        } else {
            else_block = Some(parse_block_stmt(parser)?);
            break;
        }
    }

    let end = parser.cursor.position()?;
    Ok(Stmt::If(IfStmt {
        id: parser.advance_id(),
        branches,
        else_block,
        span: Span { start, end },
    }))
}

/// The three loop forms are told apart structurally: a leading `{` means the
/// infinite form; otherwise one simple statement is parsed, and a following
/// `;` selects the full init/condition/post form while a `{` reinterprets
/// the statement as the bare loop condition.
fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.cursor.advance()?.span.start;
    let id = parser.advance_id();

    if parser.cursor.at(&TokenKind::OpenCurly)? {
        let body = parse_block_stmt(parser)?;
        let end = parser.cursor.position()?;
        return Ok(Stmt::For(ForStmt {
            id,
            init: None,
            cond: None,
            post: None,
            body,
            span: Span { start, end },
        }));
    }

    let lead = parse_simple_stmt(parser)?;

    if parser.cursor.eat(&TokenKind::Semicolon)? {
        let cond = parse_expr(parser)?;
        parser.cursor.expect(&TokenKind::Semicolon)?;

        let post = if parser.cursor.at(&TokenKind::OpenCurly)? {
            None
        } else {
            let post = parse_simple_stmt(parser)?;
            if let Stmt::Assign(assign) = &post {
                if assign.define {
                    return Err(Error::new(
                        ErrorImpl::UnexpectedTokenDetailed {
                            token: String::from(":="),
                            message: String::from("cannot declare in the post clause of a loop"),
                        },
                        post.span().start.clone(),
                    ));
                }
            }
            Some(Box::new(post))
        };

        let body = parse_block_stmt(parser)?;
        let end = parser.cursor.position()?;
        return Ok(Stmt::For(ForStmt {
            id,
            init: Some(Box::new(lead)),
            cond: Some(cond),
            post,
            body,
            span: Span { start, end },
        }));
    }

    // Single clause: must reduce to a bare expression, the loop condition.
    let Stmt::Expr(expr_stmt) = lead else {
        let token = parser.cursor.peek()?;
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.to_string(),
                message: String::from("expected `;` or `{` after the loop clause"),
            },
            token.span.start.clone(),
        ));
    };

    let body = parse_block_stmt(parser)?;
    let end = parser.cursor.position()?;
    Ok(Stmt::For(ForStmt {
        id,
        init: None,
        cond: Some(expr_stmt.expr),
        post: None,
        body,
        span: Span { start, end },
    }))
}

/// `{` newline statements `}`. The closing brace does not consume the
/// statement terminator; the enclosing statement does.
pub fn parse_block_stmt(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let start = parser
        .cursor
        .expect_message(&TokenKind::OpenCurly, Some("expected a block"))?
        .span
        .start;
    parser.cursor.expect(&TokenKind::Newline)?;

    let mut body = vec![];
    loop {
        if parser.cursor.at(&TokenKind::CloseCurly)? {
            break;
        }
        if parser.cursor.at(&TokenKind::Eof)? {
            let position = parser.cursor.position()?;
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: String::from("end of file"),
                    message: String::from("unclosed block"),
                },
                position,
            ));
        }
        body.push(parse_stmt(parser)?);
    }
    parser.cursor.expect(&TokenKind::CloseCurly)?;

    let end = parser.cursor.position()?;
    Ok(BlockStmt {
        id: parser.advance_id(),
        body,
        span: Span { start, end },
    })
}

fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.cursor.advance()?.span.start;

    let mut values = vec![];
    if !parser.cursor.at(&TokenKind::Semicolon)? && !parser.cursor.at(&TokenKind::Newline)? {
        values.push(parse_expr(parser)?);
        while parser.cursor.eat(&TokenKind::Comma)? {
            values.push(parse_expr(parser)?);
        }
    }

    let end = parser.cursor.position()?;
    Ok(Stmt::Return(ReturnStmt {
        id: parser.advance_id(),
        values,
        span: Span { start, end },
    }))
}
