use std::{
    rc::Rc,
    sync::atomic::{AtomicU32, Ordering},
};

use crate::{
    ast::{statements::Stmt, NodeId},
    errors::errors::Error,
    lexer::{lexer::Lexer, tokens::TokenKind},
};

use super::{cursor::TokenCursor, stmt::parse_stmt};

// The counter is process-wide, not per parser: a session outlives the
// parsers feeding it (one per REPL line), and its decoration table keys on
// node ids, so ids from different parsers must never collide.
static NEXT_ID: AtomicU32 = AtomicU32::new(1024);

/// Pull-based statement parser.
///
/// Each `next_stmt` call consumes exactly one top-level statement, including
/// its terminating newline, and returns `None` once the input is exhausted.
pub struct Parser {
    pub(crate) cursor: TokenCursor,
    file: Rc<String>,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Parser {
        Parser {
            file: lexer.file(),
            cursor: TokenCursor::new(lexer),
        }
    }

    pub fn file(&self) -> Rc<String> {
        Rc::clone(&self.file)
    }

    /// Claims the next free node id.
    pub fn advance_id(&mut self) -> NodeId {
        NEXT_ID.fetch_add(1, Ordering::Relaxed)
    }

    /// Parses the next top-level statement, or `None` at end of input.
    pub fn next_stmt(&mut self) -> Result<Option<Stmt>, Error> {
        if self.cursor.at(&TokenKind::Eof)? {
            return Ok(None);
        }
        Ok(Some(parse_stmt(self)?))
    }
}

/// Parses the whole input at once. The incremental pipeline pulls statements
/// one at a time instead; this is for tests and debugging.
pub fn parse_all(source: &str, file: Option<String>) -> Result<Vec<Stmt>, Error> {
    let mut parser = Parser::new(Lexer::new(source, file));
    let mut statements = vec![];

    while let Some(stmt) = parser.next_stmt()? {
        statements.push(stmt);
    }
    Ok(statements)
}
