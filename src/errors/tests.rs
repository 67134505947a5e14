//! Unit tests for the error module.

use std::rc::Rc;

use crate::Position;

use super::errors::{Error, ErrorImpl, ErrorTip};

fn position() -> Position {
    Position(3, 7, Rc::new(String::from("test.gol")))
}

#[test]
fn test_error_taxonomy_names() {
    let cases = [
        (
            ErrorImpl::UnexpectedToken {
                token: String::from(")"),
            },
            "SyntaxError",
        ),
        (
            ErrorImpl::MalformedNumber {
                literal: String::from("00"),
            },
            "SyntaxError",
        ),
        (
            ErrorImpl::Conflict {
                name: String::from("x"),
            },
            "Conflict",
        ),
        (
            ErrorImpl::SymbolNotFound {
                name: String::from("y"),
            },
            "SymbolNotFound",
        ),
        (
            ErrorImpl::TypeMismatch {
                expected: String::from("int32"),
                received: String::from("int64"),
            },
            "InvalidOperation",
        ),
        (
            ErrorImpl::OutOfRange {
                value: 99999,
                target: String::from("int16"),
            },
            "InvalidOperation",
        ),
        (ErrorImpl::DivisionByZero, "InvalidOperation"),
        (
            ErrorImpl::MisplacedControl {
                keyword: String::from("break"),
            },
            "InvalidOperation",
        ),
        (
            ErrorImpl::Internal {
                message: String::from("broken"),
            },
            "InternalError",
        ),
    ];

    for (error_impl, expected) in cases {
        let error = Error::new(error_impl, position());
        assert_eq!(error.get_error_name(), expected);
    }
}

#[test]
fn test_error_display_includes_position() {
    let error = Error::new(
        ErrorImpl::SymbolNotFound {
            name: String::from("count"),
        },
        position(),
    );

    let rendered = error.to_string();
    assert!(rendered.contains("SymbolNotFound"));
    assert!(rendered.contains("count"));
    assert!(rendered.contains("test.gol:3:7"));
}

#[test]
fn test_error_tips() {
    let error = Error::new(
        ErrorImpl::OutOfRange {
            value: 99999,
            target: String::from("int16"),
        },
        position(),
    );
    match error.get_tip() {
        ErrorTip::Suggestion(tip) => {
            assert!(tip.contains("99999"));
            assert!(tip.contains("int16"));
        }
        ErrorTip::None => panic!("expected a suggestion"),
    }

    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: String::from("#"),
        },
        position(),
    );
    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_position_accessor() {
    let error = Error::new(ErrorImpl::UnterminatedString, position());
    assert_eq!(error.get_position().0, 3);
    assert_eq!(error.get_position().1, 7);
}
