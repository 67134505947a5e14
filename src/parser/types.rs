use crate::{
    ast::types::BasicKind,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

fn as_type_keyword(kind: &TokenKind) -> Option<BasicKind> {
    match kind {
        TokenKind::Int16 => Some(BasicKind::Int16),
        TokenKind::Int32 => Some(BasicKind::Int32),
        TokenKind::Int64 => Some(BasicKind::Int64),
        TokenKind::BoolType => Some(BasicKind::Bool),
        _ => None,
    }
}

/// Consumes a type keyword if one is next.
pub fn parse_type_opt(parser: &mut Parser) -> Result<Option<BasicKind>, Error> {
    let kind = as_type_keyword(&parser.cursor.peek_kind()?);
    if kind.is_some() {
        parser.cursor.advance()?;
    }
    Ok(kind)
}

/// Consumes a mandatory type keyword.
pub fn parse_type(parser: &mut Parser) -> Result<BasicKind, Error> {
    match parse_type_opt(parser)? {
        Some(kind) => Ok(kind),
        None => {
            let token = parser.cursor.peek()?;
            Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: token.to_string(),
                    message: String::from("expected a type keyword"),
                },
                token.span.start.clone(),
            ))
        }
    }
}

/// Whether the next token starts a type keyword, without consuming it.
pub fn at_type_keyword(parser: &mut Parser) -> Result<bool, Error> {
    Ok(as_type_keyword(&parser.cursor.peek_kind()?).is_some())
}
