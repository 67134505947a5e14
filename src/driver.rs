//! Incremental pipeline driver.
//!
//! Wires the phases together statement by statement: each top-level
//! statement is parsed, checked and evaluated before the next one is even
//! tokenized, so a syntax error on line 10 never stops line 2 from running.
//! `Session` owns the state that persists across statements (the scope stack
//! and the decoration table); lexer and parser are single-use per source
//! text and many of them can feed one session, which is what a REPL does.

use crate::{
    ast::{decor::Decorations, statements::Stmt, types::Value},
    errors::errors::{Error, ErrorImpl},
    evaluator::evaluator::{Evaluator, Flow},
    lexer::lexer::Lexer,
    parser::parser::Parser,
    type_checker::{scope::ScopeStack, type_checker::type_check},
};

pub fn lex(source: &str, file: Option<String>) -> Lexer {
    Lexer::new(source, file)
}

pub fn parse(lexer: Lexer) -> Parser {
    Parser::new(lexer)
}

/// Cross-statement state: one session is one program run (or one REPL).
pub struct Session {
    scopes: ScopeStack,
    decor: Decorations,
}

impl Session {
    pub fn new() -> Self {
        Session {
            scopes: ScopeStack::new(),
            decor: Decorations::new(),
        }
    }

    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    pub fn decor(&self) -> &Decorations {
        &self.decor
    }

    /// Checks and evaluates one top-level statement. Returns the statement's
    /// echoed value, if it was a bare expression without `;`.
    ///
    /// Control-transfer statements are syntactically valid anywhere, but a
    /// signal that reaches the top level has nothing to transfer to and is
    /// reported as an error.
    pub fn evaluate(&mut self, stmt: &Stmt) -> Result<Option<Value>, Error> {
        type_check(stmt, &mut self.scopes, &mut self.decor)?;

        let flow = Evaluator::new(&mut self.scopes, &mut self.decor).exec_stmt(stmt)?;
        let escaped = match flow {
            Flow::Completed => None,
            Flow::Broke => Some("break"),
            Flow::Continued => Some("continue"),
            Flow::Returned(_) => Some("return"),
        };
        if let Some(keyword) = escaped {
            return Err(Error::new(
                ErrorImpl::MisplacedControl {
                    keyword: keyword.to_string(),
                },
                stmt.span().start.clone(),
            ));
        }

        if let Stmt::Expr(s) = stmt {
            if s.echo {
                return Ok(self.decor.value(s.id));
            }
        }
        Ok(None)
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

/// Runs a whole source text through one session, collecting the echoed
/// values in order. Stops at the first error.
pub fn run(source: &str, file: Option<String>, session: &mut Session) -> Result<Vec<Value>, Error> {
    let mut parser = parse(lex(source, file));
    let mut echoed = vec![];

    while let Some(stmt) = parser.next_stmt()? {
        if let Some(value) = session.evaluate(&stmt)? {
            echoed.push(value);
        }
    }
    Ok(echoed)
}
