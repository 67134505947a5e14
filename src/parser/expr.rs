use crate::{
    ast::{
        expressions::{
            BinOp, BinaryExpr, BoolLitExpr, Expr, FnLitExpr, IdentExpr, IntLitExpr, LogicalExpr,
            LogicalOp, Param, UnaryExpr, UnaryOp,
        },
        types::BasicKind,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{
    parser::Parser,
    stmt::parse_block_stmt,
    types::{at_type_keyword, parse_type},
};

/// Parses one expression through the precedence ladder, loosest level first.
pub fn parse_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parse_logical_or(parser)
}

fn binary(parser: &mut Parser, op: BinOp, left: Expr, right: Expr) -> Expr {
    let span = Span {
        start: left.span().start.clone(),
        end: right.span().end.clone(),
    };
    Expr::Binary(BinaryExpr {
        id: parser.advance_id(),
        op,
        left: Box::new(left),
        right: Box::new(right),
        span,
    })
}

fn logical(parser: &mut Parser, op: LogicalOp, left: Expr, right: Expr) -> Expr {
    let span = Span {
        start: left.span().start.clone(),
        end: right.span().end.clone(),
    };
    Expr::Logical(LogicalExpr {
        id: parser.advance_id(),
        op,
        left: Box::new(left),
        right: Box::new(right),
        span,
    })
}

fn parse_logical_or(parser: &mut Parser) -> Result<Expr, Error> {
    let mut left = parse_logical_and(parser)?;
    while parser.cursor.eat(&TokenKind::Or)? {
        let right = parse_logical_and(parser)?;
        left = logical(parser, LogicalOp::Or, left, right);
    }
    Ok(left)
}

fn parse_logical_and(parser: &mut Parser) -> Result<Expr, Error> {
    let mut left = parse_comparison(parser)?;
    while parser.cursor.eat(&TokenKind::And)? {
        let right = parse_comparison(parser)?;
        left = logical(parser, LogicalOp::And, left, right);
    }
    Ok(left)
}

fn parse_comparison(parser: &mut Parser) -> Result<Expr, Error> {
    let mut left = parse_additive(parser)?;
    loop {
        let op = match parser.cursor.peek_kind()? {
            TokenKind::Equals => BinOp::Eq,
            TokenKind::NotEquals => BinOp::Ne,
            TokenKind::Less => BinOp::Lt,
            TokenKind::Greater => BinOp::Gt,
            TokenKind::LessEquals => BinOp::Le,
            TokenKind::GreaterEquals => BinOp::Ge,
            _ => break,
        };
        parser.cursor.advance()?;
        let right = parse_additive(parser)?;
        left = binary(parser, op, left, right);
    }
    Ok(left)
}

fn parse_additive(parser: &mut Parser) -> Result<Expr, Error> {
    let mut left = parse_multiplicative(parser)?;
    loop {
        let op = match parser.cursor.peek_kind()? {
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            _ => break,
        };
        parser.cursor.advance()?;
        let right = parse_multiplicative(parser)?;
        left = binary(parser, op, left, right);
    }
    Ok(left)
}

fn parse_multiplicative(parser: &mut Parser) -> Result<Expr, Error> {
    let mut left = parse_unary(parser)?;
    loop {
        let op = match parser.cursor.peek_kind()? {
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::Percent => BinOp::Rem,
            _ => break,
        };
        parser.cursor.advance()?;
        let right = parse_unary(parser)?;
        left = binary(parser, op, left, right);
    }
    Ok(left)
}

fn parse_unary(parser: &mut Parser) -> Result<Expr, Error> {
    let op = match parser.cursor.peek_kind()? {
        TokenKind::Minus => UnaryOp::Neg,
        TokenKind::Not => UnaryOp::Not,
        _ => return parse_primary(parser),
    };

    let token = parser.cursor.advance()?;
    let operand = parse_unary(parser)?;
    let span = Span {
        start: token.span.start,
        end: operand.span().end.clone(),
    };
    Ok(Expr::Unary(UnaryExpr {
        id: parser.advance_id(),
        op,
        operand: Box::new(operand),
        span,
    }))
}

fn parse_primary(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.cursor.peek_kind()? {
        TokenKind::Identifier(name) => {
            let token = parser.cursor.advance()?;
            Ok(Expr::Ident(IdentExpr {
                id: parser.advance_id(),
                name,
                span: token.span,
            }))
        }
        TokenKind::Int(value) => {
            let token = parser.cursor.advance()?;
            Ok(Expr::Int(IntLitExpr {
                id: parser.advance_id(),
                value,
                span: token.span,
            }))
        }
        TokenKind::Bool(value) => {
            let token = parser.cursor.advance()?;
            Ok(Expr::Bool(BoolLitExpr {
                id: parser.advance_id(),
                value,
                span: token.span,
            }))
        }
        TokenKind::OpenParen => {
            parser.cursor.advance()?;
            let inner = parse_expr(parser)?;
            parser.cursor.expect(&TokenKind::CloseParen)?;
            Ok(inner)
        }
        TokenKind::Func => parse_fn_lit(parser),
        _ => {
            let token = parser.cursor.peek()?;
            Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: token.to_string(),
                },
                token.span.start.clone(),
            ))
        }
    }
}

/// `func(a int32, b int32) int64 { ... }`. Result types may be absent, a
/// single keyword, or a parenthesized list.
fn parse_fn_lit(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.cursor.advance()?.span.start;
    parser.cursor.expect(&TokenKind::OpenParen)?;

    let mut params: Vec<Param> = vec![];
    while !parser.cursor.at(&TokenKind::CloseParen)? {
        let token = parser.cursor.expect_message(
            &TokenKind::Identifier(String::new()),
            Some("expected a parameter name"),
        )?;
        let name = match token.kind {
            TokenKind::Identifier(name) => name,
            _ => String::new(),
        };
        let kind = parse_type(parser)?;
        params.push(Param { name, kind });

        if !parser.cursor.eat(&TokenKind::Comma)? {
            break;
        }
    }
    parser.cursor.expect(&TokenKind::CloseParen)?;

    let mut results: Vec<BasicKind> = vec![];
    if at_type_keyword(parser)? {
        results.push(parse_type(parser)?);
    } else if parser.cursor.at(&TokenKind::OpenParen)? {
        parser.cursor.advance()?;
        while !parser.cursor.at(&TokenKind::CloseParen)? {
            results.push(parse_type(parser)?);
            if !parser.cursor.eat(&TokenKind::Comma)? {
                break;
            }
        }
        parser.cursor.expect(&TokenKind::CloseParen)?;
    }

    let body = parse_block_stmt(parser)?;
    let end = parser.cursor.position()?;
    Ok(Expr::FnLit(FnLitExpr {
        id: parser.advance_id(),
        params,
        results,
        body,
        span: Span { start, end },
    }))
}
