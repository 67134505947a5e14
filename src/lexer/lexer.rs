use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span,
};

use super::{
    cursor::SourceCursor,
    tokens::{Token, TokenKind, PUNCTUATOR_LOOKUP, RESERVED_LOOKUP},
};

lazy_static! {
    // Numeric literal shapes, tried in priority order. Each pattern is
    // anchored so it matches at the cursor only.
    static ref RE_HEX: Regex = Regex::new("^0[xX][0-9a-fA-F]+").unwrap();
    static ref RE_SCIENTIFIC: Regex = Regex::new(r"^[1-9](\.[0-9]+)?[eE][0-9]+").unwrap();
    static ref RE_FLOAT: Regex = Regex::new(r"^(0|[1-9][0-9]*)?\.[0-9]+").unwrap();
    static ref RE_INTEGER: Regex = Regex::new("^(0|[1-9][0-9]*)").unwrap();
    static ref RE_WORD: Regex = Regex::new("^[a-zA-Z0-9_]+").unwrap();
}

enum NumberShape {
    Hex,
    Scientific,
    Float,
    Integer,
}

/// Single-use lazy tokenizer. Tokens are produced one at a time through
/// `next_token`; pulling again after `Eof` is an internal error.
pub struct Lexer {
    cursor: SourceCursor,
    finished: bool,
}

impl Lexer {
    pub fn new(source: &str, file: Option<String>) -> Lexer {
        Lexer {
            cursor: SourceCursor::new(source, file),
            finished: false,
        }
    }

    pub fn file(&self) -> Rc<String> {
        self.cursor.file()
    }

    pub fn next_token(&mut self) -> Result<Token, Error> {
        if self.finished {
            return Err(Error::new(
                ErrorImpl::Internal {
                    message: String::from("lexer re-invoked after end of input"),
                },
                self.cursor.position(),
            ));
        }

        loop {
            if self.cursor.at_eof() {
                self.finished = true;
                let position = self.cursor.position();
                return Ok(Token {
                    kind: TokenKind::Eof,
                    span: Span {
                        start: position.clone(),
                        end: position,
                    },
                });
            }

            if self.cursor.at_line_end() {
                let start = self.cursor.position();
                self.cursor.next_line();
                return Ok(Token {
                    kind: TokenKind::Newline,
                    span: Span {
                        start: start.clone(),
                        end: start,
                    },
                });
            }

            let Some(c) = self.cursor.peek() else {
                continue;
            };

            if c == ' ' || c == '\t' || c == '\r' {
                self.cursor.bump();
                continue;
            }

            if c == '/' && self.cursor.peek_at(1) == Some('/') {
                // Line comment; the line's Newline token is still emitted.
                while !self.cursor.at_line_end() {
                    self.cursor.bump();
                }
                continue;
            }

            if c.is_ascii_digit()
                || (c == '.' && self.cursor.peek_at(1).is_some_and(|d| d.is_ascii_digit()))
            {
                return self.lex_number();
            }

            if c.is_ascii_alphabetic() || c == '_' {
                return self.lex_word();
            }

            if c == '"' {
                return self.lex_string();
            }

            return self.lex_punctuator(c);
        }
    }

    fn lex_number(&mut self) -> Result<Token, Error> {
        let start = self.cursor.position();
        let rest = self.cursor.rest().to_string();

        let matched = RE_HEX
            .find(&rest)
            .map(|m| (NumberShape::Hex, m.end()))
            .or_else(|| {
                RE_SCIENTIFIC
                    .find(&rest)
                    .map(|m| (NumberShape::Scientific, m.end()))
            })
            .or_else(|| RE_FLOAT.find(&rest).map(|m| (NumberShape::Float, m.end())))
            .or_else(|| {
                RE_INTEGER
                    .find(&rest)
                    .map(|m| (NumberShape::Integer, m.end()))
            });

        let Some((shape, end)) = matched else {
            return Err(Error::new(
                ErrorImpl::MalformedNumber {
                    literal: numeric_run(&rest),
                },
                start,
            ));
        };

        // The literal must be immediately followed by whitespace or a
        // punctuator other than `.`; this rejects 00, 00.3, 0e1, 18e3, 3e3.6.
        let follow_ok = match rest[end..].chars().next() {
            None => true,
            Some(' ') | Some('\t') | Some('\r') => true,
            Some('.') => false,
            Some(follow) => PUNCTUATOR_LOOKUP.contains_key(&follow),
        };
        if !follow_ok {
            return Err(Error::new(
                ErrorImpl::MalformedNumber {
                    literal: numeric_run(&rest),
                },
                start,
            ));
        }

        let text = &rest[..end];
        let parse_error = || {
            Error::new(
                ErrorImpl::MalformedNumber {
                    literal: text.to_string(),
                },
                start.clone(),
            )
        };
        let kind = match shape {
            NumberShape::Hex => TokenKind::Int(
                u64::from_str_radix(&text[2..], 16).map_err(|_| parse_error())?,
            ),
            NumberShape::Scientific | NumberShape::Float => {
                TokenKind::Float(text.parse().map_err(|_| parse_error())?)
            }
            NumberShape::Integer => TokenKind::Int(text.parse().map_err(|_| parse_error())?),
        };

        self.cursor.advance_n(end);
        Ok(Token {
            kind,
            span: Span {
                start,
                end: self.cursor.position(),
            },
        })
    }

    fn lex_word(&mut self) -> Result<Token, Error> {
        let start = self.cursor.position();
        let rest = self.cursor.rest().to_string();
        // Maximal munch over the letter/digit/underscore run, then keyword
        // lookup; true/false become boolean literals.
        let end = RE_WORD.find(&rest).map(|m| m.end()).unwrap_or(0);
        let text = &rest[..end];

        let kind = match RESERVED_LOOKUP.get(text) {
            Some(kind) => kind.clone(),
            None => TokenKind::Identifier(text.to_string()),
        };

        self.cursor.advance_n(end);
        Ok(Token {
            kind,
            span: Span {
                start,
                end: self.cursor.position(),
            },
        })
    }

    fn lex_string(&mut self) -> Result<Token, Error> {
        let start = self.cursor.position();
        let rest = self.cursor.rest().to_string();
        let chars: Vec<(usize, char)> = rest.char_indices().collect();

        let mut i = 1;
        let close;
        loop {
            match chars.get(i) {
                None => {
                    // Also covers a backslash right before end-of-line:
                    // multi-line strings are not supported.
                    return Err(Error::new(ErrorImpl::UnterminatedString, start));
                }
                Some((_, '"')) => {
                    close = i;
                    break;
                }
                Some((_, '\\')) => {
                    if chars.get(i + 1).is_none() {
                        let offset = chars[i].0 as u32;
                        return Err(Error::new(
                            ErrorImpl::BadEscape {
                                sequence: String::from("\\"),
                            },
                            Position(start.0, start.1 + offset, self.cursor.file()),
                        ));
                    }
                    i += 2;
                }
                Some(_) => i += 1,
            }
        }

        let raw = &rest[chars[1].0..chars[close].0];
        let decoded = decode_escapes(raw, &start, self.cursor.file())?;

        self.cursor.advance_n(chars[close].0 + 1);
        Ok(Token {
            kind: TokenKind::Str(decoded),
            span: Span {
                start,
                end: self.cursor.position(),
            },
        })
    }

    fn lex_punctuator(&mut self, c: char) -> Result<Token, Error> {
        let start = self.cursor.position();

        let Some(entry) = PUNCTUATOR_LOOKUP.get(&c) else {
            return Err(Error::new(
                ErrorImpl::UnrecognisedToken {
                    token: c.to_string(),
                },
                start,
            ));
        };

        if let Some(follow) = self.cursor.peek_at(1) {
            if let Some((_, kind)) = entry.doubled.iter().find(|(f, _)| *f == follow) {
                // Three or more repeats of a doubled character (===, &&&,
                // +++) is a syntax error naming the whole run.
                if follow == c && self.cursor.peek_at(2) == Some(c) {
                    let run: String = self
                        .cursor
                        .rest()
                        .chars()
                        .take_while(|ch| *ch == c)
                        .collect();
                    return Err(Error::new(ErrorImpl::PunctuatorRun { run }, start));
                }

                let kind = kind.clone();
                self.cursor.advance_n(c.len_utf8() + follow.len_utf8());
                return Ok(Token {
                    kind,
                    span: Span {
                        start,
                        end: self.cursor.position(),
                    },
                });
            }
        }

        match &entry.single {
            Some(kind) => {
                let kind = kind.clone();
                self.cursor.advance_n(c.len_utf8());
                Ok(Token {
                    kind,
                    span: Span {
                        start,
                        end: self.cursor.position(),
                    },
                })
            }
            None => Err(Error::new(
                ErrorImpl::UnrecognisedToken {
                    token: c.to_string(),
                },
                start,
            )),
        }
    }
}

/// The maximal literal-looking run at the cursor, used to name malformed
/// numeric literals in error messages.
fn numeric_run(rest: &str) -> String {
    rest.chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '_')
        .collect()
}

/// Validates and decodes the escape sequences of a raw (already delimited)
/// string literal. Reports the exact offending position on failure.
fn decode_escapes(raw: &str, start: &Position, file: Rc<String>) -> Result<String, Error> {
    let mut result = String::new();
    let mut chars = raw.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }

        // Column of the backslash: one past the opening quote plus offset.
        let position = Position(start.0, start.1 + 1 + offset as u32, Rc::clone(&file));

        let Some((_, escape)) = chars.next() else {
            return Err(Error::new(
                ErrorImpl::BadEscape {
                    sequence: String::from("\\"),
                },
                position,
            ));
        };

        match escape {
            'b' => result.push('\u{0008}'),
            'f' => result.push('\u{000C}'),
            'n' => result.push('\n'),
            'r' => result.push('\r'),
            't' => result.push('\t'),
            '"' => result.push('"'),
            '/' => result.push('/'),
            '\\' => result.push('\\'),
            'u' => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = chars
                        .next()
                        .and_then(|(_, d)| d.to_digit(16))
                        .ok_or_else(|| {
                            Error::new(
                                ErrorImpl::BadEscape {
                                    sequence: String::from("\\u"),
                                },
                                position.clone(),
                            )
                        })?;
                    code = code * 16 + digit;
                }
                let decoded = char::from_u32(code).ok_or_else(|| {
                    Error::new(
                        ErrorImpl::BadEscape {
                            sequence: format!("\\u{:04X}", code),
                        },
                        position.clone(),
                    )
                })?;
                result.push(decoded);
            }
            other => {
                return Err(Error::new(
                    ErrorImpl::BadEscape {
                        sequence: format!("\\{}", other),
                    },
                    position,
                ));
            }
        }
    }

    Ok(result)
}

/// Collects the whole token stream at once. The incremental pipeline pulls
/// from `Lexer::next_token` instead; this is for tests and debugging.
pub fn tokenize(source: &str, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lexer = Lexer::new(source, file);
    let mut tokens = vec![];

    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
