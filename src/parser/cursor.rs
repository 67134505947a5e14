use std::mem::discriminant;

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    Position,
};

/// One-token lookahead over the lazy lexer.
///
/// Tokens are pulled from the lexer only on demand, which keeps the whole
/// pipeline incremental: nothing beyond the current statement's last token is
/// ever lexed. `Eof` stays in the lookahead slot once seen, so the cursor
/// never re-invokes a finished lexer.
pub struct TokenCursor {
    lexer: Lexer,
    lookahead: Option<Token>,
}

impl TokenCursor {
    pub fn new(lexer: Lexer) -> Self {
        TokenCursor {
            lexer,
            lookahead: None,
        }
    }

    fn fill(&mut self) -> Result<(), Error> {
        if self.lookahead.is_none() {
            self.lookahead = Some(self.lexer.next_token()?);
        }
        Ok(())
    }

    fn missing_lookahead() -> Error {
        Error::new(
            ErrorImpl::Internal {
                message: String::from("token lookahead empty after fill"),
            },
            Position::null(),
        )
    }

    pub fn peek(&mut self) -> Result<&Token, Error> {
        self.fill()?;
        self.lookahead.as_ref().ok_or_else(Self::missing_lookahead)
    }

    pub fn peek_kind(&mut self) -> Result<TokenKind, Error> {
        Ok(self.peek()?.kind.clone())
    }

    /// Whether the next token has the same kind as `kind`, payloads ignored.
    pub fn at(&mut self, kind: &TokenKind) -> Result<bool, Error> {
        Ok(discriminant(&self.peek()?.kind) == discriminant(kind))
    }

    pub fn advance(&mut self) -> Result<Token, Error> {
        self.fill()?;
        self.lookahead.take().ok_or_else(Self::missing_lookahead)
    }

    /// Consumes the next token if it matches, reporting whether it did.
    pub fn eat(&mut self, kind: &TokenKind) -> Result<bool, Error> {
        if self.at(kind)? {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn expect(&mut self, kind: &TokenKind) -> Result<Token, Error> {
        self.expect_message(kind, None)
    }

    /// Like `expect`, with a custom message attached to the mismatch error.
    pub fn expect_message(
        &mut self,
        kind: &TokenKind,
        message: Option<&str>,
    ) -> Result<Token, Error> {
        if self.at(kind)? {
            return self.advance();
        }

        let token = self.peek()?;
        let position = token.span.start.clone();
        let found = token.to_string();
        match message {
            Some(message) => Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: found,
                    message: message.to_string(),
                },
                position,
            )),
            None => Err(Error::new(
                ErrorImpl::UnexpectedToken { token: found },
                position,
            )),
        }
    }

    /// Position of the next unconsumed token.
    pub fn position(&mut self) -> Result<Position, Error> {
        Ok(self.peek()?.span.start.clone())
    }
}
