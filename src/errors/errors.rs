use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// The taxonomy name of the error. Syntax errors abort the current
    /// lex/parse call, the three type-error names abort checking of the
    /// current top-level statement, and internal errors are always fatal.
    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::MalformedNumber { .. }
            | ErrorImpl::BadEscape { .. }
            | ErrorImpl::UnterminatedString
            | ErrorImpl::PunctuatorRun { .. }
            | ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. } => "SyntaxError",
            ErrorImpl::Conflict { .. } => "Conflict",
            ErrorImpl::SymbolNotFound { .. } => "SymbolNotFound",
            ErrorImpl::TypeMismatch { .. }
            | ErrorImpl::OutOfRange { .. }
            | ErrorImpl::InvalidOperand { .. }
            | ErrorImpl::ArityMismatch { .. }
            | ErrorImpl::NonBoolCondition { .. }
            | ErrorImpl::DivisionByZero
            | ErrorImpl::UnsetVariable { .. }
            | ErrorImpl::MisplacedControl { .. }
            | ErrorImpl::NotImplemented { .. } => "InvalidOperation",
            ErrorImpl::Internal { .. } => "InternalError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::MalformedNumber { literal } => ErrorTip::Suggestion(format!(
                "Malformed numeric literal `{}`, check leading zeroes and exponent form",
                literal
            )),
            ErrorImpl::BadEscape { sequence } => ErrorTip::Suggestion(format!(
                "Unknown escape sequence `{}` in string literal",
                sequence
            )),
            ErrorImpl::UnterminatedString => ErrorTip::Suggestion(String::from(
                "String literal is not closed before the end of the line",
            )),
            ErrorImpl::PunctuatorRun { run } => {
                ErrorTip::Suggestion(format!("Repeated punctuator run `{}`", run))
            }
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a newline?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::Conflict { name } => {
                ErrorTip::Suggestion(format!("`{}` is already declared in this scope", name))
            }
            ErrorImpl::SymbolNotFound { name } => {
                ErrorTip::Suggestion(format!("`{}` is not declared in any enclosing scope", name))
            }
            ErrorImpl::TypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::OutOfRange { value, target } => ErrorTip::Suggestion(format!(
                "Constant `{}` does not fit in `{}`",
                value, target
            )),
            ErrorImpl::InvalidOperand { operator, operand } => ErrorTip::Suggestion(format!(
                "Operator `{}` cannot be applied to `{}`",
                operator, operand
            )),
            ErrorImpl::ArityMismatch { names, values } => ErrorTip::Suggestion(format!(
                "Declared {} name(s) but {} value(s)",
                names, values
            )),
            ErrorImpl::NonBoolCondition { received } => ErrorTip::Suggestion(format!(
                "Condition must be bool, received `{}`",
                received
            )),
            ErrorImpl::DivisionByZero => {
                ErrorTip::Suggestion(String::from("Division or remainder by zero"))
            }
            ErrorImpl::UnsetVariable { name } => ErrorTip::Suggestion(format!(
                "`{}` is read before any value was assigned to it",
                name
            )),
            ErrorImpl::MisplacedControl { keyword } => ErrorTip::Suggestion(format!(
                "`{}` is not allowed outside its enclosing construct",
                keyword
            )),
            ErrorImpl::NotImplemented { feature } => {
                ErrorTip::Suggestion(format!("{} are accepted but not implemented yet", feature))
            }
            ErrorImpl::Internal { message } => {
                ErrorTip::Suggestion(format!("Internal error: {}", message))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} at {}",
            self.get_error_name(),
            self.internal_error,
            self.position
        )
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("malformed numeric literal: {literal:?}")]
    MalformedNumber { literal: String },
    #[error("invalid escape sequence: {sequence:?}")]
    BadEscape { sequence: String },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("repeated punctuator run: {run:?}")]
    PunctuatorRun { run: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("{name:?} already declared in this scope")]
    Conflict { name: String },
    #[error("symbol {name:?} not found")]
    SymbolNotFound { name: String },
    #[error("types do not match: expected {expected:?}, received {received:?}")]
    TypeMismatch { expected: String, received: String },
    #[error("constant {value} out of range for {target}")]
    OutOfRange { value: i128, target: String },
    #[error("invalid operand {operand:?} for operator {operator:?}")]
    InvalidOperand { operator: String, operand: String },
    #[error("assignment count mismatch: {names} names, {values} values")]
    ArityMismatch { names: usize, values: usize },
    #[error("condition is not bool: {received:?}")]
    NonBoolCondition { received: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("variable {name:?} read before initialization")]
    UnsetVariable { name: String },
    #[error("{keyword:?} outside of its enclosing construct")]
    MisplacedControl { keyword: String },
    #[error("{feature} not implemented")]
    NotImplemented { feature: String },
    #[error("internal error: {message}")]
    Internal { message: String },
}
