#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod driver;
pub mod errors;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// A source location: 1-based line, 1-based column, plus the file (or
/// session) name the source came from.
#[derive(Debug, Clone)]
pub struct Position(pub u32, pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, 0, Rc::new(String::from("<null>")))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.2, self.0, self.1)
    }
}

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn null() -> Self {
        Span {
            start: Position::null(),
            end: Position::null(),
        }
    }
}

pub fn display_error(error: &Error, source: &str) {
    /*
        Error: message
        -> session.gol
           |
        20 | var a = #
           | --------^
    */

    let position = error.get_position();
    let line_number = position.0 as usize;
    let line_text = source
        .split('\n')
        .nth(line_number.saturating_sub(1))
        .unwrap_or("");

    let line_string = line_number.to_string();
    let padding = line_string.len() + 2;

    if let ErrorTip::None = error.get_tip() {
        println!("Error: {}", error.get_error_name());
    } else {
        println!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    println!("-> {}", position.2);
    println!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
    println!("{} | {}", line_string, line_text_removed.trim_end());

    let column = (position.1 as usize).max(1);
    let arrows = column.saturating_sub(removed_whitespace).max(1);

    println!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_remove_starting_whitespace() {
        let (text, removed) = super::remove_starting_whitespace("    var a = 1");
        assert_eq!(text, "var a = 1");
        assert_eq!(removed, 4);

        let (text, removed) = super::remove_starting_whitespace("no indent");
        assert_eq!(text, "no indent");
        assert_eq!(removed, 0);
    }
}
